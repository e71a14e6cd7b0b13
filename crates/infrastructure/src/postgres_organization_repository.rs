use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskward_application::{OrganizationHierarchyRepository, OrganizationRepository};
use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::{GrantId, Organization, OrganizationId, Role};

/// PostgreSQL-backed organization repository and hierarchy view.
#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    parent_id: Option<Uuid>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = AppError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Organization::new(
            OrganizationId::from_uuid(row.id),
            row.name,
            row.parent_id.map(OrganizationId::from_uuid),
        )
    }
}

fn into_organizations(rows: Vec<OrganizationRow>) -> AppResult<Vec<Organization>> {
    rows.into_iter().map(Organization::try_from).collect()
}

#[async_trait]
impl OrganizationHierarchyRepository for PostgresOrganizationRepository {
    async fn find_parent(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT parent.id, parent.name, parent.parent_id
            FROM organizations child
            JOIN organizations parent ON parent.id = child.parent_id
            WHERE child.id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve parent organization: {error}"))
        })?;

        row.map(Organization::try_from).transpose()
    }

    async fn list_children(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, parent_id
            FROM organizations
            WHERE parent_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list child organizations: {error}"))
        })?;

        into_organizations(rows)
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn create_organization(
        &self,
        organization: Organization,
        owner: Option<UserId>,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, parent_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(organization.id().as_uuid())
        .bind(organization.name())
        .bind(organization.parent_id().map(|parent_id| parent_id.as_uuid()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create organization: {error}")))?;

        if let Some(owner) = owner {
            sqlx::query(
                r#"
                INSERT INTO permissions (id, user_id, org_id, role)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(GrantId::new().as_uuid())
            .bind(owner.as_uuid())
            .bind(organization.id().as_uuid())
            .bind(Role::Owner.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to grant organization owner: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, parent_id
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find organization: {error}")))?;

        row.map(Organization::try_from).transpose()
    }

    async fn list_organizations(
        &self,
        organization_ids: &[OrganizationId],
    ) -> AppResult<Vec<Organization>> {
        let ids: Vec<Uuid> = organization_ids.iter().map(|id| id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, parent_id
            FROM organizations
            WHERE id = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?;

        into_organizations(rows)
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET name = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(organization.id().as_uuid())
        .bind(organization.name())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update organization: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                organization.id()
            )));
        }

        Ok(())
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete organization: {error}")))?;

        Ok(())
    }
}
