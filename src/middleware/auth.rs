use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use saas_authz::ClaimsPrincipal;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{Claims, verify_token};

/// Extractor that validates the bearer token and exposes the caller's claims.
///
/// Role-guarded middleware stores the extracted user in the request
/// extensions, so handlers behind it get the same value without decoding the
/// token a second time.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }

    pub fn roles(&self) -> &[String] {
        &self.0.roles
    }

    /// The principal handed to the authorizer.
    pub fn to_principal(&self) -> ClaimsPrincipal {
        ClaimsPrincipal::new(self.0.sub.clone(), self.0.roles.iter().cloned())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

        let claims = verify_token(token.trim(), &state.settings.identity)?;

        Ok(AuthUser(claims))
    }
}
