use crate::utils::error::{ReportError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ReportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 密鑰類欄位：錯誤訊息中不回顯原值
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    // 未被替換的 ${VAR} 佔位符
    if value.starts_with("${") && value.ends_with('}') {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Environment variable placeholder was not resolved".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("store_url", "https://example.myshopify.com").is_ok());
        assert!(validate_url("store_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("store_url", "").is_err());
        assert!(validate_url("store_url", "invalid-url").is_err());
        assert!(validate_url("store_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_secret() {
        assert!(validate_secret("access_token", "shpat_123").is_ok());
        assert!(matches!(
            validate_secret("access_token", "  "),
            Err(ReportError::MissingConfigError { .. })
        ));
        assert!(matches!(
            validate_secret("access_token", "${SHOPIFY_ACCESS_TOKEN}"),
            Err(ReportError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("page_size", 50, 1, 250).is_ok());
        assert!(validate_range("page_size", 0, 1, 250).is_err());
        assert!(validate_range("page_size", 251, 1, 250).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("max_throttle_retries", 5, 1).is_ok());
        assert!(validate_positive_number("max_throttle_retries", 0, 1).is_err());
    }
}
