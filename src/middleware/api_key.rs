//! Shared API key check.
//!
//! Every caller of the service presents the key configured in `API_KEY`
//! through the `x-api-key` header. The health check and the development
//! API docs are reachable without it.

use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

const EXEMPT_PREFIXES: [&str; 4] = ["/health", "/swagger-ui", "/scalar", "/api-docs"];

pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

// Comparison time depends only on the length of the keys.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if is_exempt(req.uri().path()) {
        return next.run(req).await;
    }

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        None => {
            warn!(path = %req.uri().path(), "Request without API key");
            AppError::unauthorized(anyhow!("API key was not provided")).into_response()
        }
        Some(key) if !keys_match(key.as_bytes(), state.settings.app.api_key.as_bytes()) => {
            warn!(path = %req.uri().path(), "Request with invalid API key");
            AppError::unauthorized(anyhow!("Unauthorized client")).into_response()
        }
        Some(_) => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/health"));
        assert!(is_exempt("/swagger-ui/index.html"));
        assert!(is_exempt("/api-docs/openapi.json"));
        assert!(is_exempt("/scalar"));

        assert!(!is_exempt("/healthz"));
        assert!(!is_exempt("/api/permissions/users/u1/tenants"));
        assert!(!is_exempt("/"));
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match(b"k-123", b"k-123"));
        assert!(!keys_match(b"k-124", b"k-123"));
        assert!(!keys_match(b"k-12", b"k-123"));
        assert!(!keys_match(b"", b"k-123"));
    }
}
