mod audit;
mod common;
mod organizations;
mod permissions;
mod tasks;

pub use audit::{AuditLogEntryResponse, AuditLogPageResponse};
pub use common::{HealthDependencyStatus, HealthResponse, UserIdentityResponse};
pub use organizations::{
    CreateOrganizationRequest, EffectiveRoleResponse, OrganizationHierarchyEntryResponse,
    OrganizationResponse, UpdateOrganizationRequest,
};
pub use permissions::{CreatePermissionRequest, PermissionGrantResponse, UpdatePermissionRequest};
pub use tasks::{
    CreateTaskRequest, ReorderTaskRequest, TaskColumnResponse, TaskListQuery, TaskPageResponse,
    TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};
