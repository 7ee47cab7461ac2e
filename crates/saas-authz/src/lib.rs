//! # SaaS Authz
//!
//! Role-based authorization for the SaaS permissions service, with a pluggable
//! hook that rewrites the accepted role set before membership is checked.
//!
//! This crate provides:
//!
//! - [`requirement`]: the "must hold one of these roles" requirement
//! - [`principal`]: the caller identity seen by handlers
//! - [`context`]: per-evaluation success / failure state
//! - [`customizer`]: role customizers (pass-through and config-driven mapping)
//! - [`handler`]: authorization handlers, including [`CustomRoleHandler`]
//! - [`authorizer`]: the coordinator that runs handlers in registration order
//!
//! # Evaluation Model
//!
//! Several handlers may look at the same requirement. Each one either marks
//! the context as succeeded, marks it as failed, or leaves it alone. The
//! [`Authorizer`] stops at the first handler that decides; when nobody decides
//! the request is denied.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use saas_authz::{
//!     AuthorizationDecision, Authorizer, ClaimsPrincipal, CustomRoleHandler,
//!     DenyAnonymousHandler, MappedRoleCustomizer, RolesRequirement,
//! };
//!
//! let customizer = MappedRoleCustomizer::new()
//!     .map("billing-admin", ["tenant-owner"]);
//!
//! let authorizer = Authorizer::new()
//!     .with_handler(Arc::new(DenyAnonymousHandler))
//!     .with_handler(Arc::new(CustomRoleHandler::new(Arc::new(customizer))));
//!
//! let requirement = RolesRequirement::new(["admin", "billing-admin"]);
//! let principal = ClaimsPrincipal::new("user-1", ["tenant-owner"]);
//!
//! assert_eq!(
//!     authorizer.authorize(&requirement, &principal),
//!     AuthorizationDecision::Allowed
//! );
//! ```

pub mod authorizer;
pub mod context;
pub mod customizer;
pub mod handler;
pub mod principal;
pub mod requirement;

// Re-export commonly used types at crate root
pub use authorizer::{AuthorizationDecision, Authorizer};
pub use context::AuthorizationContext;
pub use customizer::{MappedRoleCustomizer, PassThroughRoleCustomizer, RoleCustomizer};
pub use handler::{AuthorizationHandler, CustomRoleHandler, DenyAnonymousHandler};
pub use principal::{ClaimsPrincipal, Principal};
pub use requirement::RolesRequirement;
