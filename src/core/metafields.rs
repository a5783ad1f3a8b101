use crate::core::catalog::ShopifyCatalog;
use crate::core::{Metafield, MetafieldsResponse};
use crate::utils::error::{ReportError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;

impl ShopifyCatalog {
    /// 取得單一商品的所有 metafields
    ///
    /// A 429 is retried after the `Retry-After` delay for as long as the retry
    /// policy allows; any other non-2xx status fails right away.
    pub async fn fetch_metafields(&self, product_id: u64) -> Result<Vec<Metafield>> {
        let url = self.metafields_url(product_id);
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            let response = self.get(&url).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.bytes().await?;
                let parsed: MetafieldsResponse = serde_json::from_slice(&body)?;
                tracing::debug!(
                    "Product {} has {} metafields",
                    product_id,
                    parsed.metafields.len()
                );
                return Ok(parsed.metafields);
            }

            if status != StatusCode::TOO_MANY_REQUESTS {
                return Err(ReportError::UpstreamStatus {
                    status,
                    context: format!("metafields for product {}", product_id),
                });
            }

            if !self.retry.allows_retry(attempts) {
                return Err(ReportError::Throttled {
                    attempts,
                    context: format!("metafields for product {}", product_id),
                });
            }

            let delay = self.retry.delay_for(
                response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok()),
            );
            tracing::warn!(
                "⏳ Rate limit reached for product {}, waiting {:?} (attempt {})",
                product_id,
                delay,
                attempts
            );
            self.retry.wait(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopConfig;
    use crate::core::retry::{RecordingSleeper, RetryPolicy};
    use httpmock::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    const METAFIELDS_PATH: &str = "/admin/api/2023-10/products/7/metafields.json";

    fn catalog_for(server: &MockServer, retry: RetryPolicy) -> ShopifyCatalog {
        let config = ShopConfig::new(server.base_url(), "shpat_test");
        ShopifyCatalog::new(&config)
            .unwrap()
            .with_retry_policy(retry)
    }

    #[tokio::test]
    async fn test_fetch_metafields_success() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path(METAFIELDS_PATH)
                .header("x-shopify-access-token", "shpat_test");
            then.status(200).json_body(serde_json::json!({
                "metafields": [
                    {"id": 1, "namespace": "custom", "key": "download_count", "value": "42", "type": "number_integer"},
                    {"id": 2, "namespace": "global", "key": "title_tag", "value": "Libro"}
                ]
            }));
        });

        let metafields = catalog_for(&server, RetryPolicy::unbounded())
            .fetch_metafields(7)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(metafields.len(), 2);
        assert!(metafields[0].matches("custom", "download_count"));
        assert_eq!(metafields[0].display_value(), "42");
    }

    #[tokio::test]
    async fn test_non_throttle_error_fails_without_retry() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET).path(METAFIELDS_PATH);
            then.status(404).json_body(serde_json::json!({"errors": "Not Found"}));
        });

        let sleeper = Arc::new(RecordingSleeper::new());
        let result = catalog_for(
            &server,
            RetryPolicy::unbounded().with_sleeper(sleeper.clone()),
        )
        .fetch_metafields(7)
        .await;

        api_mock.assert_hits(1);
        assert!(sleeper.delays().is_empty());
        match result {
            Err(ReportError::UpstreamStatus { status, context }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(context, "metafields for product 7");
            }
            other => panic!("expected upstream status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_policy_gives_up_when_always_throttled() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET).path(METAFIELDS_PATH);
            then.status(429).header("Retry-After", "2.0");
        });

        let sleeper = Arc::new(RecordingSleeper::new());
        let result = catalog_for(
            &server,
            RetryPolicy::bounded(3).with_sleeper(sleeper.clone()),
        )
        .fetch_metafields(7)
        .await;

        api_mock.assert_hits(3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
        assert!(matches!(
            result,
            Err(ReportError::Throttled { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_retry_after_uses_default_delay() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET).path(METAFIELDS_PATH);
            then.status(429);
        });

        let sleeper = Arc::new(RecordingSleeper::new());
        let result = catalog_for(
            &server,
            RetryPolicy::bounded(2).with_sleeper(sleeper.clone()),
        )
        .fetch_metafields(7)
        .await;

        api_mock.assert_hits(2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path(METAFIELDS_PATH);
            then.status(200).json_body(serde_json::json!({"unexpected": []}));
        });

        let result = catalog_for(&server, RetryPolicy::unbounded())
            .fetch_metafields(7)
            .await;

        assert!(matches!(result, Err(ReportError::SerializationError(_))));
    }
}
