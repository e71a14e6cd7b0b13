use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use taskward_application::{PermissionAdminRepository, PermissionGrantRepository};
use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::{GrantId, OrganizationId, PermissionGrant, Role};

/// PostgreSQL-backed permission grant repository.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    id: Uuid,
    user_id: Uuid,
    org_id: Uuid,
    role: String,
}

impl TryFrom<GrantRow> for PermissionGrant {
    type Error = AppError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(row.role.as_str()).map_err(|error| {
            AppError::Internal(format!("stored grant '{}' is malformed: {error}", row.id))
        })?;

        Ok(Self {
            grant_id: GrantId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            organization_id: OrganizationId::from_uuid(row.org_id),
            role,
        })
    }
}

fn into_grants(rows: Vec<GrantRow>) -> AppResult<Vec<PermissionGrant>> {
    rows.into_iter().map(PermissionGrant::try_from).collect()
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|database_error| database_error.code())
        .is_some_and(|code| code == "23505")
}

#[async_trait]
impl PermissionGrantRepository for PostgresPermissionRepository {
    async fn find_grant(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Option<PermissionGrant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, org_id, role
            FROM permissions
            WHERE user_id = $1 AND org_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(organization_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission grant: {error}")))?;

        row.map(PermissionGrant::try_from).transpose()
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, org_id, role
            FROM permissions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission grants for user: {error}"))
        })?;

        into_grants(rows)
    }
}

#[async_trait]
impl PermissionAdminRepository for PostgresPermissionRepository {
    async fn create_grant(&self, grant: PermissionGrant) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, user_id, org_id, role)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(grant.grant_id.as_uuid())
        .bind(grant.user_id.as_uuid())
        .bind(grant.organization_id.as_uuid())
        .bind(grant.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                debug!(user_id = %grant.user_id, organization_id = %grant.organization_id, "duplicate grant rejected");
                return AppError::Conflict(format!(
                    "user '{}' already has a role in organization '{}'",
                    grant.user_id, grant.organization_id
                ));
            }
            AppError::Internal(format!("failed to create permission grant: {error}"))
        })?;

        Ok(())
    }

    async fn find_grant_by_id(&self, grant_id: GrantId) -> AppResult<Option<PermissionGrant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, org_id, role
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(grant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission grant: {error}")))?;

        row.map(PermissionGrant::try_from).transpose()
    }

    async fn list_grants_for_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<PermissionGrant>> {
        let ids: Vec<Uuid> = organization_ids.iter().map(|id| id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, org_id, role
            FROM permissions
            WHERE org_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission grants: {error}"))
        })?;

        into_grants(rows)
    }

    async fn update_grant_role(
        &self,
        grant_id: GrantId,
        role: Role,
    ) -> AppResult<PermissionGrant> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            UPDATE permissions
            SET role = $2
            WHERE id = $1
            RETURNING id, user_id, org_id, role
            "#,
        )
        .bind(grant_id.as_uuid())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update permission grant: {error}"))
        })?
        .ok_or_else(|| AppError::NotFound(format!("permission grant '{grant_id}' not found")))?;

        PermissionGrant::try_from(row)
    }

    async fn delete_grant(&self, grant_id: GrantId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(grant_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete permission grant: {error}"))
        })?;

        Ok(())
    }
}
