use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskward_core::{AppError, UserId};

use crate::{GrantId, OrganizationId};

/// Organization role held by a user, totally ordered by privilege.
///
/// Every "highest role" and "sufficient role" comparison goes through
/// [`Role::rank`]; the derived ordering is implemented on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Read-only access to the organization.
    Viewer,
    /// Manages tasks and users inside the organization.
    Admin,
    /// Full access, including the organization's direct children.
    Owner,
}

impl Role {
    /// Returns the privilege rank of this role.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Viewer => 1,
            Self::Admin => 2,
            Self::Owner => 3,
        }
    }

    /// Returns whether this role is at least as privileged as `required`.
    #[must_use]
    pub const fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Reduces any number of roles to the single most privileged one.
    #[must_use]
    pub fn highest<I>(roles: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        roles.into_iter().max_by_key(|role| role.rank())
    }

    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "VIEWER",
            Self::Admin => "ADMIN",
            Self::Owner => "OWNER",
        }
    }

    /// Returns the human-readable role name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Admin => "Administrator",
            Self::Owner => "Owner",
        }
    }

    /// Returns a short description of what the role allows.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Viewer => "Can view tasks and data",
            Self::Admin => "Can manage tasks and users",
            Self::Owner => "Full access to organization",
        }
    }

    /// Returns all known roles from least to most privileged.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Viewer, Role::Admin, Role::Owner];

        ALL
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role value '{value}'")))
    }
}

/// Coarse capability flags derived from a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleCapabilities {
    /// Every role may read.
    pub can_read: bool,
    /// Create and update tasks.
    pub can_write: bool,
    /// Delete tasks.
    pub can_delete: bool,
    /// Manage permission grants.
    pub can_manage_users: bool,
    /// Rename or delete the organization.
    pub can_manage_organization: bool,
}

impl RoleCapabilities {
    /// Returns the capabilities granted by `role`.
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        Self {
            can_read: true,
            can_write: role.satisfies(Role::Admin),
            can_delete: role.satisfies(Role::Admin),
            can_manage_users: role.satisfies(Role::Owner),
            can_manage_organization: role.satisfies(Role::Owner),
        }
    }
}

/// Explicit role grant for one user at one organization.
///
/// A user holds at most one grant per organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Stored grant identifier.
    pub grant_id: GrantId,
    /// Grantee.
    pub user_id: UserId,
    /// Organization the role applies to.
    pub organization_id: OrganizationId,
    /// Granted role.
    pub role: Role,
}

impl PermissionGrant {
    /// Creates a grant with a fresh identifier.
    #[must_use]
    pub fn new(user_id: UserId, organization_id: OrganizationId, role: Role) -> Self {
        Self {
            grant_id: GrantId::new(),
            user_id,
            organization_id,
            role,
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a task is created.
    TaskCreated,
    /// Emitted when task fields change.
    TaskUpdated,
    /// Emitted when a task moves within or across status columns.
    TaskReordered,
    /// Emitted when a task is deleted.
    TaskDeleted,
    /// Emitted when an organization is created.
    OrganizationCreated,
    /// Emitted when an organization is renamed.
    OrganizationUpdated,
    /// Emitted when an organization is deleted.
    OrganizationDeleted,
    /// Emitted when a permission grant is created.
    PermissionGranted,
    /// Emitted when a grant's role changes.
    PermissionUpdated,
    /// Emitted when a permission grant is removed.
    PermissionRevoked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskCreated => "task.created",
            Self::TaskUpdated => "task.updated",
            Self::TaskReordered => "task.reordered",
            Self::TaskDeleted => "task.deleted",
            Self::OrganizationCreated => "organization.created",
            Self::OrganizationUpdated => "organization.updated",
            Self::OrganizationDeleted => "organization.deleted",
            Self::PermissionGranted => "permission.granted",
            Self::PermissionUpdated => "permission.updated",
            Self::PermissionRevoked => "permission.revoked",
        }
    }
}
