//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod audit_log_service;
mod audit_ports;
mod authorization_service;
mod organization_service;
mod permission_service;
mod task_ports;
mod task_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    OrganizationHierarchyRepository, OrganizationRepository, PermissionAdminRepository,
    PermissionGrantRepository, UserProfile, UserRepository,
};
pub use audit_log_service::{
    AuditLogFilter, AuditLogPage, AuditLogService, DEFAULT_AUDIT_PAGE_SIZE, MAX_AUDIT_PAGE_SIZE,
};
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogListing, AuditLogQuery, AuditLogRepository,
    AuditRepository,
};
pub use authorization_service::AuthorizationService;
pub use organization_service::{CreateOrganizationInput, OrganizationService};
pub use permission_service::{CreateGrantInput, PermissionService};
pub use task_ports::{
    SortDirection, TaskListing, TaskPosition, TaskQuery, TaskRepository, TaskSortField,
    TaskStatusCounts,
};
pub use task_service::{
    CreateTaskInput, DEFAULT_TASK_PAGE_SIZE, MAX_TASK_PAGE_SIZE, ReorderTaskInput, TaskColumn,
    TaskFilter, TaskPage, TaskService, UpdateTaskInput,
};
