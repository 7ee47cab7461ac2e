use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::modules::permissions::model::Permission;
use crate::utils::errors::AppError;

pub struct PermissionService;

impl PermissionService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "permissions"))]
    pub async fn get_tenant_users(db: &PgPool, tenant_id: Uuid) -> Result<Vec<String>, AppError> {
        let user_ids = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT user_id FROM permissions WHERE tenant_id = $1 ORDER BY user_id",
        )
        .bind(tenant_id)
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, tenant.id = %tenant_id, "Database error fetching tenant users");
            AppError::database(e)
        })?;

        debug!(tenant.id = %tenant_id, count = user_ids.len(), "Fetched tenant users");
        Ok(user_ids)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "permissions"))]
    pub async fn get_user_permissions(
        db: &PgPool,
        tenant_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<Permission>, AppError> {
        sqlx::query_as::<_, Permission>(
            "SELECT id, tenant_id, user_id, permission, created_at
             FROM permissions
             WHERE tenant_id = $1 AND user_id = $2
             ORDER BY permission",
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, tenant.id = %tenant_id, user.id = %user_id, "Database error fetching permissions");
            AppError::database(e)
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "permissions"))]
    pub async fn get_user_tenants(db: &PgPool, user_id: &str) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT tenant_id FROM permissions WHERE user_id = $1 ORDER BY tenant_id",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %user_id, "Database error fetching user tenants");
            AppError::database(e)
        })
    }

    /// Grant `permissions` and return the stored rows for them.
    ///
    /// Rows that already exist are left untouched, so repeating a grant is
    /// harmless.
    #[instrument(skip(db, permissions), fields(db.operation = "INSERT", db.table = "permissions", count = permissions.len()))]
    pub async fn add_user_permissions(
        db: &PgPool,
        tenant_id: Uuid,
        user_id: &str,
        permissions: &[String],
    ) -> Result<Vec<Permission>, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;

        for permission in permissions {
            sqlx::query(
                "INSERT INTO permissions (tenant_id, user_id, permission)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (tenant_id, user_id, permission) DO NOTHING",
            )
            .bind(tenant_id)
            .bind(user_id)
            .bind(permission)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, permission = %permission, "Database error granting permission");
                AppError::database(e)
            })?;
        }

        let rows = sqlx::query_as::<_, Permission>(
            "SELECT id, tenant_id, user_id, permission, created_at
             FROM permissions
             WHERE tenant_id = $1 AND user_id = $2 AND permission = ANY($3)
             ORDER BY permission",
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(permissions)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::database)?;

        tx.commit().await.map_err(AppError::database)?;

        info!(
            tenant.id = %tenant_id,
            user.id = %user_id,
            granted = rows.len(),
            "Permissions granted"
        );
        Ok(rows)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "permissions"))]
    pub async fn remove_user_permission(
        db: &PgPool,
        tenant_id: Uuid,
        user_id: &str,
        permission: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM permissions WHERE tenant_id = $1 AND user_id = $2 AND permission = $3",
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(permission)
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error revoking permission");
            AppError::database(e)
        })?;

        if result.rows_affected() == 0 {
            debug!(tenant.id = %tenant_id, user.id = %user_id, permission = %permission, "Permission not found");
            return Err(AppError::not_found(anyhow!("Permission not found")));
        }

        info!(tenant.id = %tenant_id, user.id = %user_id, permission = %permission, "Permission revoked");
        Ok(())
    }
}
