//! Uniform error bodies

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use deckhand::DomainError;

const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Assistant temporarily unavailable, please retry";

/// Error body returned by every route
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `invalid_input`
    pub error: String,
    pub message: String,
    /// Underlying cause, only when debug errors are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a domain error to a status and body.
///
/// Upstream and storage failures get a generic message; their cause is
/// attached as `details` only when `debug` is set.
pub fn api_error(err: DomainError, debug: bool) -> ApiError {
    let status = match &err {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Repository(_) | DomainError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let (message, details) = match &err {
        DomainError::Upstream(_) => (
            UPSTREAM_UNAVAILABLE_MESSAGE.to_string(),
            Some(err.to_string()),
        ),
        DomainError::Repository(_) | DomainError::Internal(_) => {
            ("Internal server error".to_string(), Some(err.to_string()))
        }
        _ => (err.to_string(), None),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.code().to_string(),
            message,
            details: details.filter(|_| debug),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand::UpstreamError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::FORBIDDEN),
            (
                DomainError::not_found("Conversation", uuid::Uuid::nil()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Upstream(UpstreamError::Timeout),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::Repository("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(api_error(err, false).0, expected);
        }
    }

    #[test]
    fn test_upstream_detail_only_in_debug() {
        let err = || DomainError::Upstream(UpstreamError::status(500, "secret payload"));

        let (_, Json(body)) = api_error(err(), false);
        assert_eq!(body.error, "upstream_unavailable");
        assert_eq!(body.message, UPSTREAM_UNAVAILABLE_MESSAGE);
        assert!(body.details.is_none());

        let (_, Json(body)) = api_error(err(), true);
        assert!(body.details.unwrap().contains("secret payload"));
    }
}
