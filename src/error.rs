//! API Errors
//!
//! Failure taxonomy for calls against the CRM API.

use thiserror::Error;

/// Errors from the CRM API client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Opportunity was moved or deleted since the board loaded
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Target status is not a valid pipeline status
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Session expired")]
    Unauthorized,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, body: String) -> Self {
        let detail = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body.trim())
        };
        match status {
            409 => ApiError::Conflict(detail),
            404 => ApiError::NotFound(detail),
            400 | 422 => ApiError::Validation(detail),
            401 | 403 => ApiError::Unauthorized,
            _ => ApiError::Network(detail),
        }
    }

    /// Transient failures worth offering a retry for
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Decode(_))
    }

    /// Short explanation shown in a notification
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Conflict(_) => "it was changed by someone else. The board has been refreshed",
            ApiError::NotFound(_) => "it no longer exists and was removed from the board",
            ApiError::Validation(_) => "the target stage was rejected",
            ApiError::Unauthorized => "your session has expired",
            ApiError::Network(_) => "the server could not be reached",
            ApiError::Decode(_) => "the server sent an unexpected response",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ApiError::from_status(409, String::new()), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from_status(404, String::new()), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(422, String::new()), ApiError::Validation(_)));
        assert!(matches!(ApiError::from_status(400, String::new()), ApiError::Validation(_)));
        assert_eq!(ApiError::from_status(401, String::new()), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(403, String::new()), ApiError::Unauthorized);
        assert!(matches!(ApiError::from_status(503, String::new()), ApiError::Network(_)));
    }

    #[test]
    fn test_status_detail_includes_body() {
        let err = ApiError::from_status(422, "  unknown status 99 \n".to_string());
        assert_eq!(err, ApiError::Validation("HTTP 422: unknown status 99".to_string()));
        assert_eq!(err.to_string(), "Validation failed: HTTP 422: unknown status 99");
    }

    #[test]
    fn test_only_transient_errors_are_retryable() {
        assert!(ApiError::Network("timeout".into()).is_retryable());
        assert!(ApiError::Decode("bad json".into()).is_retryable());
        assert!(!ApiError::Conflict("HTTP 409".into()).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
    }
}
