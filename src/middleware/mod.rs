//! Middleware and extractors for cross-cutting request concerns.
//!
//! # Modules
//!
//! - [`forwarded`]: trusted reverse-proxy headers
//! - [`https`]: redirect of plain HTTP requests to HTTPS
//! - [`api_key`]: the shared `x-api-key` check
//! - [`auth`]: bearer-token extractor
//! - [`role`]: role-guarded routes backed by the authorizer
//!
//! # Request Flow
//!
//! 1. Proxy headers are resolved into a `ForwardedInfo` extension
//! 2. Plain HTTP is redirected when HTTPS is enforced
//! 3. The API key is checked (health and docs excepted)
//! 4. Guarded routes validate the bearer token and ask the authorizer
//! 5. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::role::require_permissions_reader;
//!
//! let routes = Router::new()
//!     .route("/tenants/{tenant_id}/users", get(get_tenant_users))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_permissions_reader));
//! ```

pub mod api_key;
pub mod auth;
pub mod forwarded;
pub mod https;
pub mod role;
