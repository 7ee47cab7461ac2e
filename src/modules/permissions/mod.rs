//! Tenant-scoped user permissions.
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: database access
//! - `model.rs`: rows and DTOs
//! - `router.rs`: routes and their role guards

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
