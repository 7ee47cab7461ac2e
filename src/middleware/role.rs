//! Role-based authorization middleware for Axum.
//!
//! Guarded routes authenticate the bearer token, then ask the shared
//! [`Authorizer`](saas_authz::Authorizer) whether the caller satisfies the
//! route's [`RolesRequirement`]. Missing or invalid tokens give 401, a denied
//! decision gives 403.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use saas_authz::RolesRequirement;
use tracing::{debug, warn};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Check an authenticated user against `requirement` using the shared authorizer.
pub fn check_roles(
    state: &AppState,
    auth_user: &AuthUser,
    requirement: &RolesRequirement,
) -> Result<(), AppError> {
    let principal = auth_user.to_principal();

    if state.authorizer.authorize(requirement, &principal).is_allowed() {
        debug!(subject = %auth_user.subject(), "Authorization succeeded");
        return Ok(());
    }

    warn!(
        subject = %auth_user.subject(),
        roles = ?auth_user.roles(),
        required = ?requirement.allowed_roles(),
        "Authorization denied"
    );
    Err(AppError::forbidden(anyhow!(
        "Access denied. Required roles: {}",
        requirement.allowed_roles().join(", ")
    )))
}

/// Middleware body shared by the role-guarded route classes.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let requirement = RolesRequirement::new(["auditor"]);
///
/// let audit_routes = Router::new()
///     .route("/audit", get(audit_handler))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         move |state, req, next| {
///             let requirement = requirement.clone();
///             async move { require_roles(state, req, next, &requirement).await }
///         },
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    requirement: &RolesRequirement,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_roles(&state, &auth_user, requirement)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Routes that read permissions (`PERMISSIONS_READER_ROLES`).
pub async fn require_permissions_reader(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let requirements = state.requirements.clone();
    match require_roles(State(state), req, next, &requirements.reader).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Routes that modify permissions (`PERMISSIONS_ADMIN_ROLES`).
pub async fn require_permissions_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let requirements = state.requirements.clone();
    match require_roles(State(state), req, next, &requirements.admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
