//! Permission data models and DTOs.
//!
//! A permission is a free-form name (for example `invoices.read`) granted to
//! a user within one tenant. Users are identified by the subject id of the
//! identity provider, tenants by UUID.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const MAX_PERMISSIONS_PER_REQUEST: usize = 50;
pub const MAX_PERMISSION_LENGTH: usize = 100;

/// A permission granted to a user in a tenant.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: String,
    pub permission: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for granting permissions to a user.
///
/// Granting a permission the user already holds is not an error; the
/// existing row is returned.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AddPermissionsDto {
    #[validate(custom(function = "validate_permission_names"))]
    pub permissions: Vec<String>,
}

fn validate_permission_names(permissions: &[String]) -> Result<(), ValidationError> {
    if permissions.is_empty() || permissions.len() > MAX_PERMISSIONS_PER_REQUEST {
        return Err(ValidationError::new("permissions_count").with_message(Cow::Owned(format!(
            "permissions must contain between 1 and {MAX_PERMISSIONS_PER_REQUEST} entries"
        ))));
    }

    let valid = permissions.iter().all(|p| {
        let p = p.trim();
        !p.is_empty() && p.chars().count() <= MAX_PERMISSION_LENGTH
    });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("permission_name").with_message(Cow::Owned(format!(
            "each permission must be between 1 and {MAX_PERMISSION_LENGTH} characters"
        ))))
    }
}

impl AddPermissionsDto {
    /// Trimmed, de-duplicated permission names in request order.
    pub fn normalized(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.permissions.len());
        for name in &self.permissions {
            let name = name.trim();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TenantUsersResponse {
    pub tenant_id: Uuid,
    pub user_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserTenantsResponse {
    pub user_id: String,
    pub tenant_ids: Vec<Uuid>,
}
