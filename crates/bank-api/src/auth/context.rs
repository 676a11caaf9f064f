// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::claims::Claims;
use super::permission::{Permission, PermissionSet};

/// Authentication context for a request.
///
/// Built from verified claims by the gate and attached to the request's
/// extensions. Immutable once built and owned by that request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthContext {
    /// Calling principal (the token subject).
    pub identity: String,
    /// Principal classification.
    pub service_type: String,
    /// Granted permissions.
    pub permissions: PermissionSet,
    /// Environment tag from the token.
    pub environment: String,
    /// The verified claims.
    #[serde(skip)]
    pub claims: Claims,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates a new authentication context from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            identity: claims.sub.clone(),
            service_type: claims.service_type.clone(),
            permissions: claims.permissions.clone(),
            environment: claims.environment.clone(),
            claims,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if the context has the given permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns `true` if the context has all of the given permissions.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.permissions.contains_all(permissions)
    }

    /// Returns `true` if the context has any of the given permissions.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.permissions.contains_any(permissions)
    }

    /// Returns when the underlying token expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: impl IntoIterator<Item = Permission>) -> Claims {
        Claims {
            iss: "bank-service".to_string(),
            sub: "svc-1".to_string(),
            exp: 2_000_000_000,
            service_type: "external".to_string(),
            permissions: permissions.into_iter().collect(),
            environment: "sandbox".to_string(),
            iat: None,
            aud: None,
        }
    }

    #[test]
    fn test_auth_context_from_claims() {
        let ctx = AuthContext::from_claims(claims([Permission::BanksRead]));

        assert_eq!(ctx.identity, "svc-1");
        assert_eq!(ctx.service_type, "external");
        assert_eq!(ctx.environment, "sandbox");
        assert!(ctx.has_permission(Permission::BanksRead));
        assert!(!ctx.has_permission(Permission::BanksWrite));
        assert_eq!(ctx.claims.exp, 2_000_000_000);
        assert!(ctx.client_ip.is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = AuthContext::from_claims(claims([]));
        let b = AuthContext::from_claims(claims([]));
        assert_ne!(a.request_id, b.request_id);

        let id = Uuid::now_v7();
        assert_eq!(a.with_request_id(id).request_id, id);
    }

    #[test]
    fn test_permission_queries() {
        let ctx = AuthContext::from_claims(claims([Permission::BanksRead]));

        assert!(ctx.has_any_permission(&[Permission::BanksRead, Permission::BanksWrite]));
        assert!(!ctx.has_all_permissions(&[Permission::BanksRead, Permission::BanksWrite]));
    }
}
