//! Simple API Key Authentication (Bearer Token)
//!
//! Guards the API as a whole. Conversation ownership is a separate check
//! made by the application services against the caller-supplied owner id.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// Expected bearer token; `None` disables authentication
#[derive(Clone, Default)]
pub struct ApiKey(Option<Arc<str>>);

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(Arc::from))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    fn verify(&self, header: Option<&str>) -> Result<(), StatusCode> {
        let Some(expected) = self.0.as_deref() else {
            return Ok(());
        };

        match header {
            Some(value) => match value.strip_prefix("Bearer ") {
                Some(token) if token == expected => Ok(()),
                Some(_) => {
                    tracing::warn!("Invalid API key attempted");
                    Err(StatusCode::UNAUTHORIZED)
                }
                None => {
                    tracing::warn!("Invalid Authorization header format");
                    Err(StatusCode::UNAUTHORIZED)
                }
            },
            None => {
                tracing::warn!("Missing Authorization header");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// Authentication middleware
/// Validates Bearer token against the API key
pub async fn auth_middleware(
    State(api_key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    api_key.verify(auth_header)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_accepts_anything() {
        let key = ApiKey::new(None);
        assert!(!key.is_enabled());
        assert!(key.verify(None).is_ok());

        assert!(!ApiKey::new(Some(String::new())).is_enabled());
    }

    #[test]
    fn test_enabled_requires_matching_bearer() {
        let key = ApiKey::new(Some("secret".to_string()));
        assert!(key.verify(Some("Bearer secret")).is_ok());
        assert_eq!(
            key.verify(Some("Bearer nope")),
            Err(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(key.verify(Some("secret")), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(key.verify(None), Err(StatusCode::UNAUTHORIZED));
    }
}
