pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{FailurePolicy, ShopConfig};
pub use crate::core::{catalog::ShopifyCatalog, engine::ReportEngine, ReportRow};
pub use crate::utils::error::{ReportError, Result};

use crate::utils::validation::Validate;

/// Builds the download report with settings taken from the environment.
///
/// Needs `SHOPIFY_ACCESS_TOKEN`; a `.env` file in the working directory is
/// read first when present. Errors are returned to the caller as-is.
pub async fn download_report() -> Result<Vec<ReportRow>> {
    let _ = dotenvy::dotenv();

    let config = ShopConfig::from_env()?;
    config.validate()?;

    ReportEngine::from_config(&config)?.run().await
}
