use axum::http::{HeaderValue, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::api_key::require_api_key;
use crate::middleware::forwarded::forwarded_headers;
use crate::middleware::https::{HSTS_MAX_AGE, https_redirect};
use crate::modules::health::controller::health_check;
use crate::modules::permissions::router::init_permissions_router;
use crate::state::AppState;

/// Build the application router.
///
/// Layers run outermost first: forwarded headers, request logging, HTTPS
/// redirect, API key, then the per-route role guards.
pub fn init_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/permissions", init_permissions_router(state.clone()));

    if settings.environment.is_development() {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .merge(Scalar::with_url("/scalar", ApiDoc::openapi()));
    }

    let router = router
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(middleware::from_fn_with_state(state.clone(), https_redirect));

    let router = if settings.https.redirect {
        router.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_MAX_AGE),
        ))
    } else {
        router
    };

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state, forwarded_headers))
}
