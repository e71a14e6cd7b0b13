//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_repository;
mod in_memory_directory;
mod in_memory_task_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_organization_repository;
mod postgres_permission_repository;
mod postgres_task_repository;
mod postgres_user_repository;

#[cfg(test)]
mod postgres_test_support;

pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_directory::InMemoryDirectory;
pub use in_memory_task_repository::InMemoryTaskRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_organization_repository::PostgresOrganizationRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_task_repository::PostgresTaskRepository;
pub use postgres_user_repository::PostgresUserRepository;
