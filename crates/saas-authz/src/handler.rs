//! Authorization handlers.
//!
//! A handler inspects a requirement and the principal carried by the
//! [`AuthorizationContext`], then either marks the context or leaves it alone.

use std::sync::Arc;

use tracing::debug;

use crate::context::AuthorizationContext;
use crate::customizer::RoleCustomizer;
use crate::requirement::RolesRequirement;

/// One unit of logic that may satisfy (or fail) a [`RolesRequirement`].
pub trait AuthorizationHandler: Send + Sync {
    fn handle(&self, context: &mut AuthorizationContext<'_>, requirement: &RolesRequirement);
}

/// Role check that runs the allowed roles through a [`RoleCustomizer`] first.
///
/// Marks the context as succeeded when the principal holds any of the
/// customized roles. In every other case it leaves the context untouched and
/// lets other handlers decide. It never marks failure.
#[derive(Clone)]
pub struct CustomRoleHandler {
    customizer: Arc<dyn RoleCustomizer>,
}

impl CustomRoleHandler {
    pub fn new(customizer: Arc<dyn RoleCustomizer>) -> Self {
        Self { customizer }
    }
}

impl AuthorizationHandler for CustomRoleHandler {
    fn handle(&self, context: &mut AuthorizationContext<'_>, requirement: &RolesRequirement) {
        let Some(custom_roles) = self.customizer.customize_roles(requirement.allowed_roles())
        else {
            debug!("role customizer returned no roles, deferring");
            return;
        };

        let principal = context.principal();
        if custom_roles.iter().any(|role| principal.is_in_role(role)) {
            context.succeed();
        } else {
            debug!(roles = ?custom_roles, "principal holds none of the customized roles");
        }
    }
}

impl std::fmt::Debug for CustomRoleHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRoleHandler").finish_non_exhaustive()
    }
}

/// Fails any requirement evaluated for an unauthenticated principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAnonymousHandler;

impl AuthorizationHandler for DenyAnonymousHandler {
    fn handle(&self, context: &mut AuthorizationContext<'_>, _requirement: &RolesRequirement) {
        if !context.principal().is_authenticated() {
            context.fail();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::customizer::{MappedRoleCustomizer, PassThroughRoleCustomizer};
    use crate::principal::{ClaimsPrincipal, Principal};

    struct FixedCustomizer(Option<Vec<String>>);

    impl RoleCustomizer for FixedCustomizer {
        fn customize_roles(&self, _allowed_roles: &[String]) -> Option<Vec<String>> {
            self.0.clone()
        }
    }

    struct CountingPrincipal {
        roles: Vec<String>,
        checks: AtomicUsize,
    }

    impl Principal for CountingPrincipal {
        fn is_in_role(&self, role: &str) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.roles.iter().any(|r| r == role)
        }
    }

    fn run(
        handler: &dyn AuthorizationHandler,
        principal: &dyn Principal,
        allowed: &[&str],
    ) -> (bool, bool) {
        let requirement = RolesRequirement::new(allowed.iter().copied());
        let mut context = AuthorizationContext::new(principal);
        handler.handle(&mut context, &requirement);
        (context.has_succeeded(), context.has_failed())
    }

    #[test]
    fn test_succeeds_on_customized_role() {
        let handler = CustomRoleHandler::new(Arc::new(
            MappedRoleCustomizer::new().map("billing-admin", ["tenant-owner"]),
        ));
        let principal = ClaimsPrincipal::new("user-1", ["tenant-owner"]);

        assert_eq!(run(&handler, &principal, &["admin", "billing-admin"]), (true, false));
    }

    #[test]
    fn test_original_role_name_no_longer_grants() {
        let handler = CustomRoleHandler::new(Arc::new(
            MappedRoleCustomizer::new().map("billing-admin", ["tenant-owner"]),
        ));
        let principal = ClaimsPrincipal::new("user-1", ["billing-admin"]);

        assert_eq!(run(&handler, &principal, &["admin", "billing-admin"]), (false, false));
    }

    #[test]
    fn test_none_from_customizer_defers() {
        let handler = CustomRoleHandler::new(Arc::new(FixedCustomizer(None)));
        let principal = ClaimsPrincipal::new("user-1", ["admin"]);

        assert_eq!(run(&handler, &principal, &["admin"]), (false, false));
    }

    #[test]
    fn test_empty_from_customizer_defers() {
        let handler = CustomRoleHandler::new(Arc::new(FixedCustomizer(Some(vec![]))));
        let principal = ClaimsPrincipal::new("user-1", ["admin"]);

        assert_eq!(run(&handler, &principal, &["admin"]), (false, false));
    }

    #[test]
    fn test_empty_requirement_never_succeeds() {
        let handler = CustomRoleHandler::new(Arc::new(PassThroughRoleCustomizer));
        let principal = ClaimsPrincipal::new("user-1", ["admin", "reader"]);

        assert_eq!(run(&handler, &principal, &[]), (false, false));
    }

    #[test]
    fn test_stops_at_first_match() {
        let handler = CustomRoleHandler::new(Arc::new(PassThroughRoleCustomizer));
        let principal = CountingPrincipal {
            roles: vec!["a".to_string()],
            checks: AtomicUsize::new(0),
        };

        assert_eq!(run(&handler, &principal, &["a", "b", "c"]), (true, false));
        assert_eq!(principal.checks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_roles_are_harmless() {
        let handler = CustomRoleHandler::new(Arc::new(FixedCustomizer(Some(vec![
            "x".to_string(),
            "x".to_string(),
        ]))));
        let principal = CountingPrincipal {
            roles: vec![],
            checks: AtomicUsize::new(0),
        };

        assert_eq!(run(&handler, &principal, &["x"]), (false, false));
        assert_eq!(principal.checks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_deny_anonymous() {
        let anonymous = ClaimsPrincipal::anonymous();
        let user = ClaimsPrincipal::new("user-1", Vec::<String>::new());

        assert_eq!(run(&DenyAnonymousHandler, &anonymous, &["admin"]), (false, true));
        assert_eq!(run(&DenyAnonymousHandler, &user, &["admin"]), (false, false));
    }
}
