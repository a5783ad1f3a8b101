//! Product listing with cursor pagination.
//!
//! Shopify returns the next page's URL in the `Link` response header, e.g.
//! `<https://shop/admin/api/2023-10/products.json?limit=50&page_info=abc>; rel="next"`.
//! The client follows it verbatim until no `rel="next"` entry is present.

use crate::config::FailurePolicy;
use crate::core::catalog::ShopifyCatalog;
use crate::core::{Product, ProductsResponse};
use crate::utils::error::{ReportError, Result};
use regex::Regex;
use reqwest::header::LINK;
use std::sync::LazyLock;

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("rel=next pattern is valid"));

/// Extracts the `rel="next"` target from a `Link` header value.
pub fn next_page_url(link_header: &str) -> Option<String> {
    NEXT_LINK
        .captures(link_header)
        .map(|caps| caps[1].to_string())
}

#[derive(Debug)]
struct ProductPage {
    products: Vec<Product>,
    next_url: Option<String>,
}

impl ShopifyCatalog {
    /// 逐頁抓取所有商品，保持原始順序
    ///
    /// With [`FailurePolicy::Continue`] a failing page ends pagination and the
    /// products gathered so far are returned. With [`FailurePolicy::Stop`] the
    /// error is returned instead.
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>> {
        let mut products = Vec::new();
        let mut next = Some(self.products_url());
        let mut page_number = 0usize;

        while let Some(url) = next.take() {
            page_number += 1;
            tracing::debug!("📄 Fetching product page {}: {}", page_number, url);

            match self.fetch_product_page(&url).await {
                Ok(page) => {
                    tracing::debug!(
                        "Page {} returned {} products",
                        page_number,
                        page.products.len()
                    );
                    products.extend(page.products);
                    next = page.next_url;
                }
                Err(e) => match self.on_listing_error {
                    FailurePolicy::Continue => {
                        tracing::error!(
                            "❌ Error fetching products (page {}), keeping {} already fetched: {}",
                            page_number,
                            products.len(),
                            e
                        );
                        break;
                    }
                    FailurePolicy::Stop => return Err(e),
                },
            }
        }

        tracing::info!(
            "📦 Fetched {} products across {} pages",
            products.len(),
            page_number
        );
        Ok(products)
    }

    async fn fetch_product_page(&self, url: &str) -> Result<ProductPage> {
        let response = self.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ReportError::UpstreamStatus {
                status,
                context: "product listing".to_string(),
            });
        }

        let next_url = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let body = response.bytes().await?;
        let parsed: ProductsResponse = serde_json::from_slice(&body)?;

        Ok(ProductPage {
            products: parsed.products,
            next_url,
        })
    }
}
