use async_trait::async_trait;
use taskward_core::{AppResult, UserId};
use taskward_domain::{AuditAction, OrganizationId};

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// User that performed the action.
    pub user_id: UserId,
    /// Organization scope used for audit visibility.
    pub organization_id: OrganizationId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Audit log entry projection for listing views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Stable event identifier.
    pub event_id: String,
    /// Acting user.
    pub user_id: UserId,
    /// Organization scope.
    pub organization_id: OrganizationId,
    /// Stable action identifier.
    pub action: String,
    /// Event resource type.
    pub resource_type: String,
    /// Event resource identifier.
    pub resource_id: String,
    /// Optional event detail.
    pub detail: Option<String>,
    /// Event timestamp in RFC3339.
    pub created_at: String,
}

/// Store-level audit log query, already scoped to visible organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Organizations whose entries may be returned.
    pub organization_ids: Vec<OrganizationId>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

/// One page of audit entries plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogListing {
    /// Entries in newest-first order.
    pub entries: Vec<AuditLogEntry>,
    /// Total entries matching the query.
    pub total: usize,
}

/// Repository port for reading audit logs.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists the most recent entries in the requested organizations.
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<AuditLogListing>;
}
