//! Caller identity as seen by authorization handlers.

use serde::{Deserialize, Serialize};

/// The authenticated (or anonymous) caller of a request.
///
/// Handlers only ever read a principal; it is never mutated during evaluation.
pub trait Principal: Send + Sync {
    /// Check if the principal holds the given role
    fn is_in_role(&self, role: &str) -> bool;

    /// Whether the principal was authenticated at all
    fn is_authenticated(&self) -> bool {
        true
    }
}

/// Principal built from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    pub subject: String,
    pub roles: Vec<String>,
}

impl ClaimsPrincipal {
    pub fn new<I, S>(subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// A principal with no identity and no roles
    pub fn anonymous() -> Self {
        Self {
            subject: String::new(),
            roles: Vec::new(),
        }
    }
}

impl Principal for ClaimsPrincipal {
    fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    fn is_authenticated(&self) -> bool {
        !self.subject.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_role() {
        let principal = ClaimsPrincipal::new("user-1", ["admin", "reader"]);

        assert!(principal.is_in_role("admin"));
        assert!(principal.is_in_role("reader"));
        assert!(!principal.is_in_role("owner"));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let principal = ClaimsPrincipal::new("user-1", ["Admin"]);
        assert!(!principal.is_in_role("admin"));
    }

    #[test]
    fn test_anonymous() {
        let principal = ClaimsPrincipal::anonymous();

        assert!(!principal.is_authenticated());
        assert!(!principal.is_in_role("admin"));
    }
}
