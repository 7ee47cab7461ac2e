use serde::{Deserialize, Serialize};

/// Requirement satisfied when the caller holds at least one of the allowed roles.
///
/// Built once per guarded endpoint and only ever read by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesRequirement {
    allowed_roles: Vec<String>,
}

impl RolesRequirement {
    pub fn new<I, S>(allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_roles(&self) -> &[String] {
        &self.allowed_roles
    }
}

impl From<Vec<String>> for RolesRequirement {
    fn from(allowed_roles: Vec<String>) -> Self {
        Self { allowed_roles }
    }
}
