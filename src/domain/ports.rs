use crate::domain::model::{Metafield, Product};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn store_url(&self) -> &str;
    fn api_version(&self) -> &str;
    fn access_token(&self) -> &str;
    fn page_size(&self) -> usize;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Where products and their metafields come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>>;
    async fn metafields(&self, product_id: u64) -> Result<Vec<Metafield>>;
}
