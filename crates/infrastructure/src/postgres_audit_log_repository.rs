use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskward_application::{AuditLogEntry, AuditLogListing, AuditLogQuery, AuditLogRepository};
use taskward_core::{AppError, AppResult, UserId};
use taskward_domain::OrganizationId;

/// PostgreSQL-backed repository for audit log read models.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    event_id: Uuid,
    user_id: Uuid,
    org_id: Uuid,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: String,
    total: i64,
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<AuditLogListing> {
        let limit = i64::try_from(query.limit.max(1)).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let organization_ids: Vec<Uuid> = query
            .organization_ids
            .iter()
            .map(|id| id.as_uuid())
            .collect();

        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                id AS event_id,
                user_id,
                org_id,
                action,
                resource_type,
                resource_id,
                detail,
                to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
                COUNT(*) OVER () AS total
            FROM audit_log_entries
            WHERE org_id = ANY($1)
            ORDER BY audit_log_entries.created_at DESC, id DESC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(organization_ids.clone())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        // An offset past the end yields no rows and therefore no window count.
        let total = match rows.first() {
            Some(row) => row.total,
            None => sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM audit_log_entries WHERE org_id = ANY($1)",
            )
            .bind(organization_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count audit log entries: {error}"))
            })?,
        };

        Ok(AuditLogListing {
            entries: rows
                .into_iter()
                .map(|row| AuditLogEntry {
                    event_id: row.event_id.to_string(),
                    user_id: UserId::from_uuid(row.user_id),
                    organization_id: OrganizationId::from_uuid(row.org_id),
                    action: row.action,
                    resource_type: row.resource_type,
                    resource_id: row.resource_id,
                    detail: row.detail,
                    created_at: row.created_at,
                })
                .collect(),
            total: usize::try_from(total).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests;
