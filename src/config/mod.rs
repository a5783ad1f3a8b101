pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_STORE_URL: &str = "https://dfzypg-gw.myshopify.com";
pub const DEFAULT_API_VERSION: &str = "2023-10";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// Shopify REST 單頁上限
pub const MAX_PAGE_SIZE: usize = 250;

/// What to do when one upstream call fails while building a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log it and keep what we have.
    #[default]
    Continue,
    /// Abort the report with the error.
    Stop,
}

impl FromStr for FailurePolicy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "stop" => Ok(FailurePolicy::Stop),
            other => Err(ReportError::InvalidConfigValueError {
                field: "failure_policy".to_string(),
                value: other.to_string(),
                reason: "Expected 'continue' or 'stop'".to_string(),
            }),
        }
    }
}

#[derive(Clone, Parser)]
#[command(name = "shop-download-stats")]
#[command(about = "Serves a download-count report for a Shopify store's products")]
pub struct ShopConfig {
    #[arg(long, env = "SHOPIFY_STORE", default_value = DEFAULT_STORE_URL)]
    pub store_url: String,

    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true, default_value = "")]
    pub access_token: String,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    #[arg(long, help = "Per-request timeout in seconds (no timeout when omitted)")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, help = "Give up after this many throttled attempts (retry forever when omitted)")]
    pub max_throttle_retries: Option<u32>,

    #[arg(long, default_value_t = 1)]
    pub default_retry_delay_secs: u64,

    #[arg(long, value_enum, default_value_t = FailurePolicy::Continue)]
    pub on_listing_error: FailurePolicy,

    #[arg(long, value_enum, default_value_t = FailurePolicy::Continue)]
    pub on_metafield_error: FailurePolicy,

    #[arg(short, long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ShopConfig {
    /// 以預設值建立，主要給測試與程式化呼叫使用
    pub fn new(store_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
            page_size: DEFAULT_PAGE_SIZE,
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            request_timeout_secs: None,
            max_throttle_retries: None,
            default_retry_delay_secs: 1,
            on_listing_error: FailurePolicy::Continue,
            on_metafield_error: FailurePolicy::Continue,
            config: None,
            verbose: false,
            log_json: false,
        }
    }

    /// 從環境變數載入配置；只有存取權杖是必填
    pub fn from_env() -> Result<Self> {
        let access_token =
            env::var("SHOPIFY_ACCESS_TOKEN").map_err(|_| ReportError::MissingConfigError {
                field: "SHOPIFY_ACCESS_TOKEN".to_string(),
            })?;

        let mut config = Self::new(
            env::var("SHOPIFY_STORE").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
            access_token,
        );
        config.api_version =
            env::var("SHOPIFY_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        config.page_size = env_or("SHOPIFY_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        config.port = env_or("PORT", DEFAULT_PORT)?;
        config.request_timeout_secs = env_opt("SHOPIFY_REQUEST_TIMEOUT_SECS")?;
        config.max_throttle_retries = env_opt("SHOPIFY_MAX_THROTTLE_RETRIES")?;
        config.on_listing_error = env_or("SHOPIFY_ON_LISTING_ERROR", FailurePolicy::Continue)?;
        config.on_metafield_error =
            env_or("SHOPIFY_ON_METAFIELD_ERROR", FailurePolicy::Continue)?;

        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn default_retry_delay(&self) -> Duration {
        Duration::from_secs(self.default_retry_delay_secs)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    Ok(env_opt(name)?.unwrap_or(default))
}

fn env_opt<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReportError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: "Could not parse value".to_string(),
            }),
        Err(_) => Ok(None),
    }
}

// 權杖不可出現在日誌中
impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("store_url", &self.store_url)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("listen", &self.listen_address())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_throttle_retries", &self.max_throttle_retries)
            .field("default_retry_delay_secs", &self.default_retry_delay_secs)
            .field("on_listing_error", &self.on_listing_error)
            .field("on_metafield_error", &self.on_metafield_error)
            .finish()
    }
}

impl ConfigProvider for ShopConfig {
    fn store_url(&self) -> &str {
        &self.store_url
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for ShopConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("store_url", &self.store_url)?;
        validation::validate_non_empty_string("api_version", &self.api_version)?;
        validation::validate_secret("access_token", &self.access_token)?;
        validation::validate_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        validation::validate_non_empty_string("bind", &self.bind)?;

        if let Some(max) = self.max_throttle_retries {
            validation::validate_positive_number("max_throttle_retries", max as usize, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ShopConfig::new("https://example.myshopify.com", "shpat_test");

        assert_eq!(config.api_version, "2023-10");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.listen_address(), "0.0.0.0:3000");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.default_retry_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_missing_token() {
        let config = ShopConfig::new(DEFAULT_STORE_URL, "");
        assert!(matches!(
            config.validate(),
            Err(ReportError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_oversized_page() {
        let mut config = ShopConfig::new(DEFAULT_STORE_URL, "shpat_test");
        config.page_size = 500;
        assert!(config.validate().is_err());

        config.page_size = 250;
        config.max_throttle_retries = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ShopConfig::new(DEFAULT_STORE_URL, "shpat_very_secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("shpat_very_secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_parse_cli_flags() {
        let config = ShopConfig::parse_from([
            "shop-download-stats",
            "--store-url",
            "https://other.myshopify.com",
            "--access-token",
            "shpat_cli",
            "--page-size",
            "100",
            "--max-throttle-retries",
            "5",
            "--on-listing-error",
            "stop",
        ]);

        assert_eq!(config.store_url, "https://other.myshopify.com");
        assert_eq!(config.access_token, "shpat_cli");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_throttle_retries, Some(5));
        assert_eq!(config.on_listing_error, FailurePolicy::Stop);
        assert_eq!(config.on_metafield_error, FailurePolicy::Continue);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!(
            "Continue".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Continue
        );
        assert_eq!("stop".parse::<FailurePolicy>().unwrap(), FailurePolicy::Stop);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
