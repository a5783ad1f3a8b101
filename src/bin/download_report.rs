use anyhow::Context;
use clap::Parser;
use shop_download_stats::config::toml_config::TomlConfig;
use shop_download_stats::utils::{logger, validation::Validate};
use shop_download_stats::{ReportEngine, ReportRow, ShopConfig};

#[derive(Parser)]
#[command(name = "download_report")]
#[command(about = "Prints the download report once and exits")]
struct Args {
    #[command(flatten)]
    shop: ShopConfig,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logger::init_cli_logger(args.shop.verbose);

    let config = match &args.shop.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("loading config file '{}'", path))?
            .into_shop_config(),
        None => args.shop.clone(),
    };

    config.validate().context("invalid configuration")?;

    let rows = ReportEngine::from_config(&config)?
        .run()
        .await
        .context("building download report")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&rows);
    }

    Ok(())
}

fn print_table(rows: &[ReportRow]) {
    let width = rows
        .iter()
        .map(|r| r.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Libro".len());

    println!("{:<width$}  Descargas", "Libro", width = width);
    println!("{}", "-".repeat(width + 11));
    for row in rows {
        println!("{:<width$}  {}", row.title, row.downloads, width = width);
    }
}
