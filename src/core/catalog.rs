use crate::config::{FailurePolicy, ShopConfig};
use crate::core::retry::RetryPolicy;
use crate::core::{CatalogSource, ConfigProvider, Metafield, Product};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST client for the product catalog.
///
/// Listing lives in `fetcher.rs`, metafield lookups in `metafields.rs`.
pub struct ShopifyCatalog {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) access_token: String,
    pub(crate) page_size: usize,
    pub(crate) retry: RetryPolicy,
    pub(crate) on_listing_error: FailurePolicy,
}

impl ShopifyCatalog {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_base: format!(
                "{}/admin/api/{}",
                config.store_url().trim_end_matches('/'),
                config.api_version()
            ),
            access_token: config.access_token().to_string(),
            page_size: config.page_size(),
            retry: RetryPolicy::unbounded(),
            on_listing_error: FailurePolicy::Continue,
        })
    }

    /// 套用 ShopConfig 裡的重試與錯誤策略
    pub fn from_config(config: &ShopConfig) -> Result<Self> {
        let retry = match config.max_throttle_retries {
            Some(max) => RetryPolicy::bounded(max),
            None => RetryPolicy::unbounded(),
        }
        .with_default_delay(config.default_retry_delay());

        Ok(Self::new(config)?
            .with_retry_policy(retry)
            .with_listing_policy(config.on_listing_error))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_listing_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_listing_error = policy;
        self
    }

    pub fn products_url(&self) -> String {
        format!("{}/products.json?limit={}", self.api_base, self.page_size)
    }

    pub fn metafields_url(&self, product_id: u64) -> String {
        format!("{}/products/{}/metafields.json", self.api_base, product_id)
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
    }
}

#[async_trait]
impl CatalogSource for ShopifyCatalog {
    async fn products(&self) -> Result<Vec<Product>> {
        self.fetch_all_products().await
    }

    async fn metafields(&self, product_id: u64) -> Result<Vec<Metafield>> {
        self.fetch_metafields(product_id).await
    }
}
