//! Shared utilities.
//!
//! - [`errors`]: the HTTP error type returned by handlers and middleware
//! - [`jwt`]: bearer-token creation and verification

pub mod errors;
pub mod jwt;
