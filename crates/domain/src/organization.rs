use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use taskward_core::{AppResult, NonEmptyString};

use crate::OrganizationId;

/// Organization node in the two-level hierarchy.
///
/// Roots have no parent; departments point at exactly one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: NonEmptyString,
    parent_id: Option<OrganizationId>,
}

impl Organization {
    /// Creates a validated organization.
    pub fn new(
        id: OrganizationId,
        name: impl Into<String>,
        parent_id: Option<OrganizationId>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            parent_id,
        })
    }

    /// Returns the organization identifier.
    #[must_use]
    pub fn id(&self) -> OrganizationId {
        self.id
    }

    /// Returns the organization name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent organization, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<OrganizationId> {
        self.parent_id
    }

    /// Returns whether this organization sits at the top of the hierarchy.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns a copy with a new validated name.
    pub fn renamed(&self, name: impl Into<String>) -> AppResult<Self> {
        Self::new(self.id, name, self.parent_id)
    }
}

/// Flattened hierarchy row used by navigation views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationHierarchyEntry {
    /// Organization at this position.
    pub organization: Organization,
    /// Depth from the nearest emitted root.
    pub level: u8,
    /// Parent organization name when the parent is part of the input.
    pub parent_name: Option<String>,
}

/// Orders organizations as roots followed by their descendants, siblings sorted by name.
///
/// Organizations whose parent is absent from `organizations` are treated as roots.
#[must_use]
pub fn flatten_hierarchy(organizations: Vec<Organization>) -> Vec<OrganizationHierarchyEntry> {
    let known: HashSet<OrganizationId> = organizations.iter().map(Organization::id).collect();
    let names: HashMap<OrganizationId, String> = organizations
        .iter()
        .map(|organization| (organization.id(), organization.name().to_owned()))
        .collect();

    let mut sorted = organizations;
    sorted.sort_by(|left, right| left.name().cmp(right.name()));

    let mut entries = Vec::with_capacity(sorted.len());
    for root in sorted.iter().filter(|organization| {
        organization
            .parent_id()
            .is_none_or(|parent_id| !known.contains(&parent_id))
    }) {
        push_with_descendants(root, 0, &sorted, &names, &mut entries);
    }

    entries
}

fn push_with_descendants(
    organization: &Organization,
    level: u8,
    sorted: &[Organization],
    names: &HashMap<OrganizationId, String>,
    entries: &mut Vec<OrganizationHierarchyEntry>,
) {
    entries.push(OrganizationHierarchyEntry {
        organization: organization.clone(),
        level,
        parent_name: organization
            .parent_id()
            .and_then(|parent_id| names.get(&parent_id).cloned()),
    });

    for child in sorted
        .iter()
        .filter(|candidate| candidate.parent_id() == Some(organization.id()))
    {
        push_with_descendants(child, level.saturating_add(1), sorted, names, entries);
    }
}
