use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Configuration error: {message}")]
    ConfigValidationError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("API responded with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("State error: {message}")]
    StateError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// 錯誤分類，對應主機端看到的四種錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Api,
    LocalState,
}

impl ProviderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProviderError::ConfigValidationError { .. }
            | ProviderError::MissingConfigError { .. }
            | ProviderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ProviderError::AuthenticationError { .. } => ErrorCategory::Authentication,
            ProviderError::ApiError { .. } | ProviderError::TransportError(_) => ErrorCategory::Api,
            ProviderError::StateError { .. }
            | ProviderError::SerializationError(_)
            | ProviderError::IoError(_) => ErrorCategory::LocalState,
        }
    }

    /// 給診斷訊息用的細節：有回應內容就用回應內容，否則用原始錯誤文字
    pub fn detail(&self) -> String {
        match self {
            ProviderError::ApiError { status, body } => {
                if body.trim().is_empty() {
                    format!("API responded with status {} and an empty body", status)
                } else {
                    body.clone()
                }
            }
            ProviderError::AuthenticationError { message }
            | ProviderError::ConfigValidationError { message }
            | ProviderError::StateError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the provider settings and the VPC_* environment variables"
            }
            ErrorCategory::Authentication => "Verify the client id and client secret",
            ErrorCategory::Api => "Inspect the API response above; the operation was not retried",
            ErrorCategory::LocalState => "Check that the state file is readable and writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_detail_uses_body() {
        let err = ProviderError::ApiError {
            status: 409,
            body: r#"{"message":"cidr overlaps"}"#.to_string(),
        };
        assert_eq!(err.detail(), r#"{"message":"cidr overlaps"}"#);
        assert_eq!(err.category(), ErrorCategory::Api);
    }

    #[test]
    fn test_api_error_detail_with_empty_body() {
        let err = ProviderError::ApiError {
            status: 502,
            body: String::new(),
        };
        assert!(err.detail().contains("502"));
    }

    #[test]
    fn test_categories() {
        let missing = ProviderError::MissingConfigError {
            field: "org_id".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);

        let state = ProviderError::StateError {
            message: "broken".to_string(),
        };
        assert_eq!(state.category(), ErrorCategory::LocalState);
        assert_eq!(state.detail(), "broken");
    }
}
