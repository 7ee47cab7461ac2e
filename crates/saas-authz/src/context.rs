use crate::principal::Principal;

/// Ambient state for a single requirement evaluation.
///
/// Handlers record their verdict here. Success and failure are tracked
/// separately so a handler that succeeds never hides one that failed.
pub struct AuthorizationContext<'a> {
    principal: &'a dyn Principal,
    succeeded: bool,
    failed: bool,
}

impl<'a> AuthorizationContext<'a> {
    pub fn new(principal: &'a dyn Principal) -> Self {
        Self {
            principal,
            succeeded: false,
            failed: false,
        }
    }

    pub fn principal(&self) -> &'a dyn Principal {
        self.principal
    }

    /// Mark the requirement as satisfied
    pub fn succeed(&mut self) {
        self.succeeded = true;
    }

    /// Mark the requirement as explicitly failed
    pub fn fail(&mut self) {
        self.failed = true;
    }

    pub fn has_succeeded(&self) -> bool {
        self.succeeded && !self.failed
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

impl std::fmt::Debug for AuthorizationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationContext")
            .field("succeeded", &self.succeeded)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
