use crate::config::{FailurePolicy, ShopConfig};
use crate::core::catalog::ShopifyCatalog;
use crate::core::report::assemble_report;
use crate::core::{CatalogSource, ReportRow};
use crate::utils::error::Result;
use std::sync::Arc;

/// Runs one report: list products, resolve metafields, assemble rows.
pub struct ReportEngine {
    source: Arc<dyn CatalogSource>,
    on_metafield_error: FailurePolicy,
}

impl ReportEngine {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            on_metafield_error: FailurePolicy::Continue,
        }
    }

    pub fn from_config(config: &ShopConfig) -> Result<Self> {
        let catalog = ShopifyCatalog::from_config(config)?;
        Ok(Self::new(Arc::new(catalog)).with_metafield_policy(config.on_metafield_error))
    }

    pub fn with_metafield_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_metafield_error = policy;
        self
    }

    pub async fn run(&self) -> Result<Vec<ReportRow>> {
        tracing::info!("🚀 Building download report");

        // Extract
        let products = self.source.products().await?;
        if products.is_empty() {
            tracing::warn!("No products found, report is empty");
            return Ok(Vec::new());
        }

        // Transform
        let rows = assemble_report(self.source.as_ref(), &products, self.on_metafield_error).await?;

        tracing::info!(
            "✅ Report ready: {} rows from {} products",
            rows.len(),
            products.len()
        );
        Ok(rows)
    }
}
