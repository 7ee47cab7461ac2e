use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::permissions::model::{
    AddPermissionsDto, Permission, TenantUsersResponse, UserTenantsResponse,
};
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/permissions/tenants/{tenant_id}/users",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Users holding a permission in the tenant", body = TenantUsersResponse),
        (status = 401, description = "Missing API key or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - permissions reader role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [], "bearer_auth" = [])
    ),
    tag = "Permissions"
)]
#[instrument(skip(state))]
pub async fn get_tenant_users(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<TenantUsersResponse>, AppError> {
    let user_ids = PermissionService::get_tenant_users(&state.db, tenant_id).await?;
    Ok(Json(TenantUsersResponse { tenant_id, user_ids }))
}

#[utoipa::path(
    get,
    path = "/api/permissions/tenants/{tenant_id}/users/{user_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("user_id" = String, Path, description = "User subject ID")
    ),
    responses(
        (status = 200, description = "Permissions of the user in the tenant", body = Vec<Permission>),
        (status = 401, description = "Missing API key or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - permissions reader role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [], "bearer_auth" = [])
    ),
    tag = "Permissions"
)]
#[instrument(skip(state))]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path((tenant_id, user_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = PermissionService::get_user_permissions(&state.db, tenant_id, &user_id).await?;
    Ok(Json(permissions))
}

#[utoipa::path(
    post,
    path = "/api/permissions/tenants/{tenant_id}/users/{user_id}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("user_id" = String, Path, description = "User subject ID")
    ),
    request_body = AddPermissionsDto,
    responses(
        (status = 201, description = "Permissions granted", body = Vec<Permission>),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Missing API key or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - permissions admin role required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [], "bearer_auth" = [])
    ),
    tag = "Permissions"
)]
#[instrument(skip(state, auth_user, dto), fields(actor = %auth_user.subject()))]
pub async fn add_user_permissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((tenant_id, user_id)): Path<(Uuid, String)>,
    ValidatedJson(dto): ValidatedJson<AddPermissionsDto>,
) -> Result<(StatusCode, Json<Vec<Permission>>), AppError> {
    let names = dto.normalized();
    let permissions =
        PermissionService::add_user_permissions(&state.db, tenant_id, &user_id, &names).await?;

    info!(actor = %auth_user.subject(), tenant.id = %tenant_id, user.id = %user_id, "Granted permissions");
    Ok((StatusCode::CREATED, Json(permissions)))
}

#[utoipa::path(
    delete,
    path = "/api/permissions/tenants/{tenant_id}/users/{user_id}/{permission}",
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant ID"),
        ("user_id" = String, Path, description = "User subject ID"),
        ("permission" = String, Path, description = "Permission name")
    ),
    responses(
        (status = 204, description = "Permission revoked"),
        (status = 401, description = "Missing API key or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - permissions admin role required", body = ErrorResponse),
        (status = 404, description = "Permission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [], "bearer_auth" = [])
    ),
    tag = "Permissions"
)]
#[instrument(skip(state, auth_user), fields(actor = %auth_user.subject()))]
pub async fn remove_user_permission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((tenant_id, user_id, permission)): Path<(Uuid, String, String)>,
) -> Result<StatusCode, AppError> {
    PermissionService::remove_user_permission(&state.db, tenant_id, &user_id, &permission).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/permissions/users/{user_id}/tenants",
    params(
        ("user_id" = String, Path, description = "User subject ID")
    ),
    responses(
        (status = 200, description = "Tenants in which the user holds a permission", body = UserTenantsResponse),
        (status = 401, description = "Missing API key or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - permissions reader role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [], "bearer_auth" = [])
    ),
    tag = "Permissions"
)]
#[instrument(skip(state))]
pub async fn get_user_tenants(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserTenantsResponse>, AppError> {
    let tenant_ids = PermissionService::get_user_tenants(&state.db, &user_id).await?;
    Ok(Json(UserTenantsResponse { user_id, tenant_ids }))
}
