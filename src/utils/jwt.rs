//! Bearer-token handling for role-guarded routes.
//!
//! Tokens are HS256 JWTs signed with `JWT_SIGNING_SECRET`. The `roles` claim
//! carries the caller's roles as issued by the identity provider; issuer and
//! audience are only checked when configured.
//!
//! # Example
//!
//! ```ignore
//! use saas_permissions::utils::jwt::{create_access_token, verify_token};
//!
//! let token = create_access_token("svc-billing", &["permissions.reader".into()], &identity)?;
//! let claims = verify_token(&token, &identity)?;
//! assert_eq!(claims.sub, "svc-billing");
//! ```

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use saas_config::IdentityOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Issue a token for `subject` carrying `roles`, valid for `token_expiry` seconds.
///
/// Used by operators and tests to mint tokens for service-to-service callers.
pub fn create_access_token(
    subject: &str,
    roles: &[String],
    identity: &IdentityOptions,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: subject.to_string(),
        roles: roles.to_vec(),
        exp: now + identity.token_expiry,
        iat: now,
        iss: identity.issuer.clone(),
        aud: identity.audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(identity.signing_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {e}")))
}

/// Verify signature, expiry and the configured issuer/audience of `token`.
///
/// # Errors
///
/// Returns a 401 [`AppError`] for any token that does not validate.
pub fn verify_token(token: &str, identity: &IdentityOptions) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &identity.issuer {
        Some(issuer) => validation.set_issuer(&[issuer]),
        None => validation.iss = None,
    }
    match &identity.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(identity.signing_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        AppError::unauthorized(anyhow!("Invalid or expired token"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn identity() -> IdentityOptions {
        IdentityOptions {
            signing_secret: "unit-test-secret".to_string(),
            issuer: None,
            audience: None,
            token_expiry: 3600,
        }
    }

    #[test]
    fn test_token_round_trip_keeps_roles() {
        let identity = identity();
        let roles = vec!["permissions.reader".to_string(), "tenant-owner".to_string()];

        let token = create_access_token("svc-billing", &roles, &identity).unwrap();
        let claims = verify_token(&token, &identity).unwrap();

        assert_eq!(claims.sub, "svc-billing");
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = create_access_token("svc", &[], &identity()).unwrap();

        let mut other = identity();
        other.signing_secret = "another-secret".to_string();

        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut identity = identity();
        identity.token_expiry = -3600;

        let token = create_access_token("svc", &[], &identity).unwrap();
        assert!(verify_token(&token, &identity).is_err());
    }

    #[test]
    fn test_issuer_and_audience_are_checked_when_configured() {
        let mut issuing = identity();
        issuing.issuer = Some("https://login.example.com".to_string());
        issuing.audience = Some("permissions-api".to_string());
        let token = create_access_token("svc", &[], &issuing).unwrap();

        assert!(verify_token(&token, &issuing).is_ok());

        let mut other_audience = issuing.clone();
        other_audience.audience = Some("graph-api".to_string());
        assert!(verify_token(&token, &other_audience).is_err());

        let mut other_issuer = issuing;
        other_issuer.issuer = Some("https://evil.example.com".to_string());
        assert!(verify_token(&token, &other_issuer).is_err());
    }

    #[test]
    fn test_missing_roles_claim_defaults_to_empty() {
        let identity = identity();
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "svc", "exp": now + 60, "iat": now }),
            &EncodingKey::from_secret(identity.signing_secret.as_bytes()),
        )
        .unwrap();

        let claims = verify_token(&token, &identity).unwrap();
        assert!(claims.roles.is_empty());
    }
}
