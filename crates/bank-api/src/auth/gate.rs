// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization gate.
//!
//! The gate runs in two steps for every protected request:
//!
//! 1. [`AuthGate::authenticate`] turns an `Authorization` header into an
//!    [`AuthContext`], or fails with an authentication error.
//! 2. [`AuthGate::authorize`] checks a [`PermissionRequirement`] against that
//!    context, or fails with an authorization error.
//!
//! Every failure is terminal. There is no anonymous fallback.

use std::sync::Arc;

use super::context::AuthContext;
use super::error::{AuthError, AuthResult};
use super::jwt::JwtCodec;
use super::permission::Permission;

/// Prefix expected on the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// PermissionRequirement
// =============================================================================

/// How a multi-permission requirement is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Every listed permission must be held.
    All,
    /// At least one listed permission must be held.
    Any,
}

/// Permissions a route requires, with the mode used to evaluate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequirement {
    permissions: Vec<Permission>,
    mode: MatchMode,
}

impl PermissionRequirement {
    /// Requires a single permission.
    pub fn single(permission: Permission) -> Self {
        Self {
            permissions: vec![permission],
            mode: MatchMode::All,
        }
    }

    /// Requires every one of the given permissions.
    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            mode: MatchMode::All,
        }
    }

    /// Requires at least one of the given permissions.
    pub fn any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            mode: MatchMode::Any,
        }
    }

    /// Returns the listed permissions.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Returns the match mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns `true` if no permissions are listed.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Evaluates the requirement against a context.
    ///
    /// An empty requirement is never satisfied.
    pub fn is_satisfied_by(&self, context: &AuthContext) -> bool {
        if self.permissions.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::All => context.has_all_permissions(&self.permissions),
            MatchMode::Any => context.has_any_permission(&self.permissions),
        }
    }

    /// Returns the wire names of the listed permissions.
    pub fn names(&self) -> Vec<&'static str> {
        self.permissions.iter().map(Permission::as_str).collect()
    }
}

impl From<Permission> for PermissionRequirement {
    fn from(permission: Permission) -> Self {
        Self::single(permission)
    }
}

// =============================================================================
// AuthGate
// =============================================================================

/// Authenticates bearer tokens and evaluates permission requirements.
///
/// Built once at startup. Cloning shares the underlying codec.
#[derive(Debug, Clone)]
pub struct AuthGate {
    codec: Arc<JwtCodec>,
}

impl AuthGate {
    /// Creates a gate over the given codec.
    pub fn new(codec: Arc<JwtCodec>) -> Self {
        Self { codec }
    }

    /// Returns the codec used for verification.
    pub fn codec(&self) -> &Arc<JwtCodec> {
        &self.codec
    }

    /// Authenticates the raw value of an `Authorization` header.
    pub fn authenticate(&self, header: Option<&str>) -> AuthResult<AuthContext> {
        let token = header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MissingCredentials)?;

        match self.codec.verify(token) {
            Ok(claims) => {
                let context = AuthContext::from_claims(claims);
                tracing::debug!(
                    identity = %context.identity,
                    service_type = %context.service_type,
                    request_id = %context.request_id,
                    "Token verified"
                );
                Ok(context)
            }
            Err(e) => {
                tracing::debug!(reason = e.kind(), error = %e, "Token rejected");
                Err(AuthError::AuthenticationFailed(e))
            }
        }
    }

    /// Checks a requirement against the context produced by [`authenticate`].
    ///
    /// A missing context is reported as an authorization failure.
    ///
    /// [`authenticate`]: AuthGate::authenticate
    pub fn authorize(
        &self,
        context: Option<&AuthContext>,
        requirement: &PermissionRequirement,
    ) -> AuthResult<()> {
        authorize(context, requirement)
    }
}

/// Checks a requirement against a context.
///
/// Stateless. The tower layers call this directly since they do not hold a
/// codec.
pub fn authorize(
    context: Option<&AuthContext>,
    requirement: &PermissionRequirement,
) -> AuthResult<()> {
    let Some(context) = context else {
        tracing::warn!(
            required = ?requirement.names(),
            "Authorization evaluated without an authentication context"
        );
        return Err(AuthError::ContextMissing);
    };

    if requirement.is_satisfied_by(context) {
        return Ok(());
    }

    tracing::warn!(
        identity = %context.identity,
        request_id = %context.request_id,
        required = ?requirement.names(),
        mode = ?requirement.mode(),
        granted = ?context.permissions.to_names(),
        "Permission denied"
    );

    Err(AuthError::InsufficientPermissions {
        required: requirement.clone(),
        mode: requirement.mode(),
    })
}

// =============================================================================
// Tests
// =============================================================================
