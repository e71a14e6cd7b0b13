use std::sync::Arc;

use taskward_core::{AppError, AppResult, UserIdentity};
use taskward_domain::{OrganizationId, Role};

use crate::{AuditLogEntry, AuditLogQuery, AuditLogRepository, AuthorizationService};

/// Default page size for audit listings.
pub const DEFAULT_AUDIT_PAGE_SIZE: usize = 50;
/// Largest page size accepted for audit listings.
pub const MAX_AUDIT_PAGE_SIZE: usize = 200;

/// Caller-level audit log filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    /// Restrict to one organization.
    pub organization_id: Option<OrganizationId>,
    /// Requested page size.
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: usize,
}

/// One page of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogPage {
    /// Entries, newest first.
    pub entries: Vec<AuditLogEntry>,
    /// Total matching entries.
    pub total: usize,
    /// Page size applied.
    pub limit: usize,
    /// Rows skipped.
    pub offset: usize,
    /// Whether more entries follow this page.
    pub has_more: bool,
}

/// Application service exposing the audit trail to organization administrators.
#[derive(Clone)]
pub struct AuditLogService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Lists audit entries from organizations where the caller is at least ADMIN.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        filter: AuditLogFilter,
    ) -> AppResult<AuditLogPage> {
        let limit = match filter.limit {
            None => DEFAULT_AUDIT_PAGE_SIZE,
            Some(0) => {
                return Err(AppError::Validation("limit must be at least 1".to_owned()));
            }
            Some(limit) => limit.min(MAX_AUDIT_PAGE_SIZE),
        };

        let administered = self
            .authorization_service
            .organizations_with_role(actor.user_id(), Role::Admin)
            .await?;
        let organization_ids: Vec<OrganizationId> = match filter.organization_id {
            Some(organization_id) if administered.contains(&organization_id) => {
                vec![organization_id]
            }
            Some(_) => Vec::new(),
            None => administered.into_iter().collect(),
        };

        if organization_ids.is_empty() {
            return Ok(AuditLogPage {
                limit,
                offset: filter.offset,
                ..AuditLogPage::default()
            });
        }

        let listing = self
            .repository
            .list_entries(AuditLogQuery {
                organization_ids,
                limit,
                offset: filter.offset,
            })
            .await?;

        let has_more = filter.offset + listing.entries.len() < listing.total;
        Ok(AuditLogPage {
            entries: listing.entries,
            total: listing.total,
            limit,
            offset: filter.offset,
            has_more,
        })
    }
}
