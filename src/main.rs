use clap::Parser;
use shop_download_stats::config::toml_config::TomlConfig;
use shop_download_stats::utils::{logger, validation::Validate};
use shop_download_stats::{server, ShopConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在時忽略
    let _ = dotenvy::dotenv();

    let cli = ShopConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting shop-download-stats");

    let config = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(file_config) => file_config.into_shop_config(),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => cli,
    };

    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = server::serve(&config).await {
        tracing::error!("❌ Server stopped: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(if e.is_config_error() { 1 } else { 2 });
    }

    Ok(())
}
