use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use taskward_application::{
    AuditEvent, AuditLogEntry, AuditLogListing, AuditLogQuery, AuditLogRepository,
    AuditRepository,
};
use taskward_core::AppResult;

/// In-memory audit trail that records events in append order.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.entries.write().await.push(AuditLogEntry {
            event_id: Uuid::new_v4().to_string(),
            user_id: event.user_id,
            organization_id: event.organization_id,
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at: Utc::now().to_rfc3339(),
        });
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepository {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<AuditLogListing> {
        let entries = self.entries.read().await;
        let matching: Vec<&AuditLogEntry> = entries
            .iter()
            .rev()
            .filter(|entry| query.organization_ids.contains(&entry.organization_id))
            .collect();

        Ok(AuditLogListing {
            total: matching.len(),
            entries: matching
                .into_iter()
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect(),
        })
    }
}
