//! Role customizers rewrite the allowed role set of a requirement before
//! membership is checked.
//!
//! A customizer returns:
//!
//! - `Some(roles)`: the roles that grant access under customization (may be empty)
//! - `None`: no opinion, the gate grants nothing
//!
//! Customizers may consult external state (tenant configuration, a cache) but
//! must not mutate the requirement or the principal, and must return a value
//! instead of failing. If they do I/O they own its timeouts and concurrency.

use std::collections::{HashMap, HashSet};

/// Remaps or filters a requirement's allowed roles.
pub trait RoleCustomizer: Send + Sync {
    fn customize_roles(&self, allowed_roles: &[String]) -> Option<Vec<String>>;
}

/// Returns the allowed roles unchanged.
///
/// With this customizer the gate behaves exactly like a plain role check.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughRoleCustomizer;

impl RoleCustomizer for PassThroughRoleCustomizer {
    fn customize_roles(&self, allowed_roles: &[String]) -> Option<Vec<String>> {
        Some(allowed_roles.to_vec())
    }
}

/// Replaces configured roles with their targets.
///
/// Unmapped roles pass through. A role mapped to an empty target list is
/// dropped. The output keeps the order of first appearance without duplicates.
#[derive(Debug, Clone, Default)]
pub struct MappedRoleCustomizer {
    mappings: HashMap<String, Vec<String>>,
}

impl MappedRoleCustomizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `targets`, replacing any previous mapping for `source`
    pub fn map<I, S>(mut self, source: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mappings
            .insert(source.into(), targets.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for MappedRoleCustomizer {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
        }
    }
}

impl RoleCustomizer for MappedRoleCustomizer {
    fn customize_roles(&self, allowed_roles: &[String]) -> Option<Vec<String>> {
        let mut seen = HashSet::new();
        let mut roles = Vec::with_capacity(allowed_roles.len());

        for role in allowed_roles {
            let replaced = match self.mappings.get(role) {
                Some(targets) => targets.as_slice(),
                None => std::slice::from_ref(role),
            };

            for target in replaced {
                if seen.insert(target.as_str()) {
                    roles.push(target.clone());
                }
            }
        }

        Some(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pass_through_returns_input() {
        let input = roles(&["admin", "billing-admin"]);
        assert_eq!(PassThroughRoleCustomizer.customize_roles(&input), Some(input));
    }

    #[test]
    fn test_pass_through_empty() {
        assert_eq!(PassThroughRoleCustomizer.customize_roles(&[]), Some(vec![]));
    }

    #[test]
    fn test_mapping_replaces_role() {
        let customizer = MappedRoleCustomizer::new().map("billing-admin", ["tenant-owner"]);

        assert_eq!(
            customizer.customize_roles(&roles(&["admin", "billing-admin"])),
            Some(roles(&["admin", "tenant-owner"]))
        );
    }

    #[test]
    fn test_mapping_to_many() {
        let customizer =
            MappedRoleCustomizer::new().map("reader", ["tenant-reader", "tenant-owner"]);

        assert_eq!(
            customizer.customize_roles(&roles(&["reader"])),
            Some(roles(&["tenant-reader", "tenant-owner"]))
        );
    }

    #[test]
    fn test_mapping_to_nothing_drops_role() {
        let customizer = MappedRoleCustomizer::new().map("auditor", Vec::<String>::new());

        assert_eq!(
            customizer.customize_roles(&roles(&["auditor", "admin"])),
            Some(roles(&["admin"]))
        );
        assert_eq!(customizer.customize_roles(&roles(&["auditor"])), Some(vec![]));
    }

    #[test]
    fn test_duplicates_collapse_in_first_seen_order() {
        let customizer = MappedRoleCustomizer::new()
            .map("billing-admin", ["tenant-owner"])
            .map("owner", ["tenant-owner"]);

        assert_eq!(
            customizer.customize_roles(&roles(&["billing-admin", "admin", "owner", "admin"])),
            Some(roles(&["tenant-owner", "admin"]))
        );
    }

    #[test]
    fn test_from_iterator() {
        let customizer: MappedRoleCustomizer =
            vec![("a".to_string(), vec!["b".to_string()])].into_iter().collect();

        assert_eq!(customizer.len(), 1);
        assert_eq!(customizer.customize_roles(&roles(&["a"])), Some(roles(&["b"])));
    }
}
