use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status} while fetching {context}")]
    UpstreamStatus { status: StatusCode, context: String },

    #[error("Still rate limited after {attempts} attempts while fetching {context}")]
    Throttled { attempts: u32, context: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template rendering error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ReportError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::Http(_) => "Could not reach the store API".to_string(),
            ReportError::UpstreamStatus { status, context } => {
                format!("The store API answered {} for {}", status, context)
            }
            ReportError::Throttled { context, .. } => {
                format!("The store API kept rate limiting requests for {}", context)
            }
            ReportError::IoError(e) => format!("File or network error: {}", e),
            ReportError::SerializationError(_) => {
                "The store API returned data in an unexpected format".to_string()
            }
            ReportError::TemplateError(_) => "Could not render the report page".to_string(),
            ReportError::ConfigError { message } => format!("Configuration problem: {}", message),
            ReportError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            ReportError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::Http(_) => "Check network connectivity and the configured store URL",
            ReportError::UpstreamStatus { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "Check that SHOPIFY_ACCESS_TOKEN is valid for this store"
            }
            ReportError::UpstreamStatus { .. } => {
                "Check the store URL, API version and the app's access scopes"
            }
            ReportError::Throttled { .. } => {
                "Retry later or raise --max-throttle-retries"
            }
            ReportError::IoError(_) => "Check file permissions and that the port is free",
            ReportError::SerializationError(_) => "Check that the API version is supported",
            ReportError::TemplateError(_) => "Report this as a bug",
            ReportError::ConfigError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Fix the setting via command-line flag, environment variable or config file"
            }
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ReportError::ConfigError { .. }
                | ReportError::MissingConfigError { .. }
                | ReportError::InvalidConfigValueError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_message_includes_reason() {
        let err = ReportError::UpstreamStatus {
            status: StatusCode::NOT_FOUND,
            context: "metafields for product 7".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Upstream returned 404 Not Found while fetching metafields for product 7"
        );
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_unauthorized_suggests_token() {
        let err = ReportError::UpstreamStatus {
            status: StatusCode::UNAUTHORIZED,
            context: "product listing".to_string(),
        };
        assert!(err.recovery_suggestion().contains("SHOPIFY_ACCESS_TOKEN"));
    }

    #[test]
    fn test_config_errors_are_classified() {
        let err = ReportError::MissingConfigError {
            field: "access_token".to_string(),
        };
        assert!(err.is_config_error());
        assert_eq!(
            err.user_friendly_message(),
            "Required setting 'access_token' is missing"
        );
    }
}
