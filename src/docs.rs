use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::middleware::api_key::API_KEY_HEADER;
use crate::modules::health::controller::HealthResponse;
use crate::modules::permissions::model::{
    AddPermissionsDto, Permission, TenantUsersResponse, UserTenantsResponse,
};
use crate::utils::errors::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::permissions::controller::get_tenant_users,
        crate::modules::permissions::controller::get_user_permissions,
        crate::modules::permissions::controller::add_user_permissions,
        crate::modules::permissions::controller::remove_user_permission,
        crate::modules::permissions::controller::get_user_tenants,
    ),
    components(
        schemas(
            Permission,
            AddPermissionsDto,
            TenantUsersResponse,
            UserTenantsResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Permissions", description = "Tenant-scoped user permissions")
    ),
    info(
        title = "SaaS Permissions API",
        version = "0.1.0",
        description = "Stores and serves the permissions users hold in each tenant of the SaaS platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_permission_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/permissions/users/{user_id}/tenants"));
        assert!(
            doc.paths
                .paths
                .contains_key("/api/permissions/tenants/{tenant_id}/users/{user_id}/{permission}")
        );

        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("api_key"));
        assert!(schemes.contains_key("bearer_auth"));
    }
}
