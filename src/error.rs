use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the FitFam data layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitFamError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FitFamError>;

impl FitFamError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => FitFamError::Unauthorized(msg),
            StatusCode::FORBIDDEN => FitFamError::Unauthorized(msg),
            StatusCode::NOT_FOUND => FitFamError::NotFound(msg),
            // PostgREST answers 406 when a single-object read matched no row
            StatusCode::NOT_ACCEPTABLE => FitFamError::NotFound(msg),
            StatusCode::BAD_REQUEST => FitFamError::BadRequest(msg),
            status if status.is_server_error() => FitFamError::Backend(msg),
            status if status.is_client_error() => FitFamError::BadRequest(msg),
            _ => FitFamError::Backend(msg),
        }
    }
}

impl From<reqwest::Error> for FitFamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FitFamError::Decode(err.to_string())
        } else {
            FitFamError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FitFamError {
    fn from(err: serde_json::Error) -> Self {
        FitFamError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_from_status_mapping() {
        let error = FitFamError::from_status(StatusCode::UNAUTHORIZED, "jwt expired".to_string());
        assert_eq!(error, FitFamError::Unauthorized("jwt expired".to_string()));

        let error = FitFamError::from_status(StatusCode::NOT_ACCEPTABLE, String::new());
        assert_matches!(error, FitFamError::NotFound(_));

        let error = FitFamError::from_status(StatusCode::CONFLICT, "duplicate key".to_string());
        assert_matches!(error, FitFamError::BadRequest(_));

        let error = FitFamError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(error, FitFamError::Backend("Bad Gateway".to_string()));
    }

    #[test]
    fn test_not_authenticated_message() {
        assert_eq!(FitFamError::NotAuthenticated.to_string(), "Not authenticated");
    }
}
