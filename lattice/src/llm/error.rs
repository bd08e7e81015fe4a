//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the text-generation API
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Check if the API rejected the credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, LlmError::ApiError { status, .. } if *status == 401 || *status == 403)
            || matches!(self, LlmError::ApiError { status: 400, message } if message.contains("API_KEY_INVALID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limit() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert!(err.is_rate_limit());

        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_is_auth_failure() {
        assert!(
            LlmError::ApiError {
                status: 403,
                message: "forbidden".to_string()
            }
            .is_auth_failure()
        );
        assert!(
            LlmError::ApiError {
                status: 400,
                message: "API key not valid. reason: API_KEY_INVALID".to_string()
            }
            .is_auth_failure()
        );
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "bad schema".to_string()
            }
            .is_auth_failure()
        );
        assert!(!LlmError::InvalidResponse("empty".to_string()).is_auth_failure());
    }
}
