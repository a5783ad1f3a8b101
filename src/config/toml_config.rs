use crate::config::{
    FailurePolicy, ShopConfig, DEFAULT_API_VERSION, DEFAULT_BIND, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    DEFAULT_STORE_URL,
};
use crate::utils::error::{ReportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub shop: ShopSection,
    pub server: Option<ServerSection>,
    pub retry: Option<RetrySection>,
    pub error_handling: Option<ErrorHandlingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopSection {
    pub store_url: Option<String>,
    pub api_version: Option<String>,
    pub access_token: Option<String>,
    pub page_size: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub default_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingSection {
    pub on_listing_error: Option<FailurePolicy>,
    pub on_metafield_error: Option<FailurePolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOPIFY_ACCESS_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 轉成執行用的 ShopConfig；檔案沒寫的欄位用預設值，權杖退回環境變數
    pub fn into_shop_config(self) -> ShopConfig {
        let access_token = self
            .shop
            .access_token
            .or_else(|| std::env::var("SHOPIFY_ACCESS_TOKEN").ok())
            .unwrap_or_default();

        let mut config = ShopConfig::new(
            self.shop
                .store_url
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            access_token,
        );
        config.api_version = self
            .shop
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        config.page_size = self.shop.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        config.request_timeout_secs = self.shop.request_timeout_seconds;

        if let Some(server) = self.server {
            config.bind = server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
            config.port = server.port.unwrap_or(DEFAULT_PORT);
        }

        if let Some(retry) = self.retry {
            config.max_throttle_retries = retry.max_attempts;
            config.default_retry_delay_secs = retry.default_delay_seconds.unwrap_or(1);
        }

        if let Some(handling) = self.error_handling {
            config.on_listing_error = handling.on_listing_error.unwrap_or_default();
            config.on_metafield_error = handling.on_metafield_error.unwrap_or_default();
        }

        config
    }
}
