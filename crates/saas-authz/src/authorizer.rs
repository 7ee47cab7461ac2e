//! Authorization coordinator.
//!
//! Handlers are registered explicitly and run in registration order. The
//! first handler that leaves the context failed or succeeded decides the
//! outcome; remaining handlers are skipped. An evaluation nobody decides is
//! denied.

use std::sync::Arc;

use tracing::debug;

use crate::context::AuthorizationContext;
use crate::handler::AuthorizationHandler;
use crate::principal::Principal;
use crate::requirement::RolesRequirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allowed,
    Denied,
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Clone, Default)]
pub struct Authorizer {
    handlers: Vec<Arc<dyn AuthorizationHandler>>,
}

impl Authorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn AuthorizationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Evaluate `requirement` for `principal`.
    ///
    /// Every call starts from a fresh context, so repeated calls with the same
    /// inputs give the same decision.
    pub fn authorize(
        &self,
        requirement: &RolesRequirement,
        principal: &dyn Principal,
    ) -> AuthorizationDecision {
        let mut context = AuthorizationContext::new(principal);

        for handler in &self.handlers {
            handler.handle(&mut context, requirement);

            if context.has_failed() {
                debug!(roles = ?requirement.allowed_roles(), "authorization failed by handler");
                return AuthorizationDecision::Denied;
            }
            if context.has_succeeded() {
                return AuthorizationDecision::Allowed;
            }
        }

        debug!(roles = ?requirement.allowed_roles(), "no handler satisfied the requirement");
        AuthorizationDecision::Denied
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
