// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission vocabulary and permission sets.
//!
//! The vocabulary is closed: every capability a token can carry is a variant
//! of [`Permission`]. Adding a capability is a code change.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capabilities that can be granted to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Read bank and bank-group metadata.
    #[serde(rename = "banks:read")]
    BanksRead,
    /// Create, update and delete bank and bank-group metadata.
    #[serde(rename = "banks:write")]
    BanksWrite,
}

impl Permission {
    /// Returns the wire name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::BanksRead => "banks:read",
            Permission::BanksWrite => "banks:write",
        }
    }

    /// Parses a permission from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "banks:read" => Some(Permission::BanksRead),
            "banks:write" => Some(Permission::BanksWrite),
            _ => None,
        }
    }

    /// Returns every permission in the vocabulary.
    pub fn all() -> &'static [Permission] {
        &[Permission::BanksRead, Permission::BanksWrite]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not part of the permission vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse(s.trim()).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

// =============================================================================
// Permission Set
// =============================================================================

/// An unordered set of permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a permission set from a list of permissions.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Adds a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Returns `true` if the set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Returns `true` if the set contains all of the given permissions.
    ///
    /// An empty `permissions` slice is trivially contained.
    pub fn contains_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.permissions.contains(p))
    }

    /// Returns `true` if the set contains any of the given permissions.
    ///
    /// Always `false` for an empty `permissions` slice.
    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.permissions.contains(p))
    }

    /// Returns the number of permissions in the set.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns an iterator over the permissions.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Returns the wire names, sorted so output is stable.
    pub fn to_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.permissions.iter().map(Permission::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::from_permissions(iter)
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(permissions: [Permission; N]) -> Self {
        Self::from_permissions(permissions)
    }
}

// =============================================================================
// Tests
// =============================================================================
