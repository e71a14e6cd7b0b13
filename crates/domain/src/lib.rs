//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod ids;
mod organization;
mod security;
mod task;

pub use ids::{GrantId, OrganizationId, TaskId};
pub use organization::{Organization, OrganizationHierarchyEntry, flatten_hierarchy};
pub use security::{AuditAction, PermissionGrant, Role, RoleCapabilities};
pub use task::{Task, TaskStatus};
pub use taskward_core::UserId;
