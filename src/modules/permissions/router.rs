use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::middleware::role::{require_permissions_admin, require_permissions_reader};
use crate::state::AppState;

use super::controller::{
    add_user_permissions, get_tenant_users, get_user_permissions, get_user_tenants,
    remove_user_permission,
};

/// Permission routes, mounted under `/api/permissions`.
///
/// Reads require a reader role and writes an admin role; the role layer is
/// attached per method so both can share a path.
pub fn init_permissions_router(state: AppState) -> Router<AppState> {
    let reader = middleware::from_fn_with_state(state.clone(), require_permissions_reader);
    let admin = middleware::from_fn_with_state(state, require_permissions_admin);

    Router::new()
        .route(
            "/tenants/{tenant_id}/users",
            get(get_tenant_users).route_layer(reader.clone()),
        )
        .route(
            "/tenants/{tenant_id}/users/{user_id}",
            get(get_user_permissions).route_layer(reader.clone()),
        )
        .route(
            "/tenants/{tenant_id}/users/{user_id}",
            post(add_user_permissions).route_layer(admin.clone()),
        )
        .route(
            "/tenants/{tenant_id}/users/{user_id}/{permission}",
            delete(remove_user_permission).route_layer(admin),
        )
        .route(
            "/users/{user_id}/tenants",
            get(get_user_tenants).route_layer(reader),
        )
}
