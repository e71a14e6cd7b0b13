use serde::Serialize;
use taskward_application::{AuditLogEntry, AuditLogPage};

/// API representation of one audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub user_id: String,
    pub organization_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

/// One page of audit log entries.
#[derive(Debug, Serialize)]
pub struct AuditLogPageResponse {
    pub entries: Vec<AuditLogEntryResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            user_id: value.user_id.to_string(),
            organization_id: value.organization_id.to_string(),
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at,
        }
    }
}

impl From<AuditLogPage> for AuditLogPageResponse {
    fn from(value: AuditLogPage) -> Self {
        Self {
            entries: value
                .entries
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
            total: value.total,
            limit: value.limit,
            offset: value.offset,
            has_more: value.has_more,
        }
    }
}
