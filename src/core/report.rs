use crate::config::FailurePolicy;
use crate::core::{CatalogSource, Metafield, Product, ReportRow};
use crate::utils::error::Result;

pub const DOWNLOAD_COUNT_NAMESPACE: &str = "custom";
pub const DOWNLOAD_COUNT_KEY: &str = "download_count";
/// 商品沒有下載次數時顯示的字串
pub const NO_DATA: &str = "Sin datos";

pub fn download_count(metafields: &[Metafield]) -> String {
    metafields
        .iter()
        .find(|m| m.matches(DOWNLOAD_COUNT_NAMESPACE, DOWNLOAD_COUNT_KEY))
        .map(Metafield::display_value)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Resolves each product's metafields in order and builds one row per product.
///
/// Under [`FailurePolicy::Continue`] a product whose metafields cannot be
/// fetched is logged and left out of the report.
pub async fn assemble_report(
    source: &dyn CatalogSource,
    products: &[Product],
    on_metafield_error: FailurePolicy,
) -> Result<Vec<ReportRow>> {
    let mut rows = Vec::with_capacity(products.len());

    for product in products {
        match source.metafields(product.id).await {
            Ok(metafields) => rows.push(ReportRow {
                title: product.title.clone(),
                downloads: download_count(&metafields),
            }),
            Err(e) => match on_metafield_error {
                FailurePolicy::Continue => {
                    tracing::error!(
                        "❌ Error with product \"{}\" ({}), skipping: {}",
                        product.title,
                        product.id,
                        e
                    );
                }
                FailurePolicy::Stop => return Err(e),
            },
        }
    }

    Ok(rows)
}
