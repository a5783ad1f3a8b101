use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RUST_LOG 未設定時使用的預設過濾規則，兩種輸出格式共用
fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directives(verbose))
    })
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "shop_download_stats=debug,download_report=debug,tower_http=debug,info"
    } else {
        "shop_download_stats=info,download_report=info,tower_http=info"
    }
}

pub fn init_cli_logger(verbose: bool) {
    let filter = default_filter(verbose);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON 格式，方便交給日誌收集器
pub fn init_json_logger() {
    let filter = default_filter(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
