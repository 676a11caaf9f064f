// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization error types.

use std::fmt;

use thiserror::Error;

use super::gate::{MatchMode, PermissionRequirement};

/// Result type alias for gate operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// TokenError
// =============================================================================

/// Reasons a token fails verification.
///
/// These are kept distinct for logging and tests. Callers outside the gate only
/// ever see them wrapped in [`AuthError::AuthenticationFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is not three non-empty segments with a decodable header.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match the configured key and algorithm.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The `iss` claim is missing or differs from the configured issuer.
    #[error("unexpected token issuer")]
    IssuerMismatch {
        /// Issuer found in the token, if any.
        actual: Option<String>,
    },

    /// `exp` is not strictly greater than the current time.
    #[error("token has expired")]
    Expired {
        /// Expiry carried by the token (seconds since epoch).
        expired_at: i64,
    },

    /// A required claim is missing, mistyped, or outside the vocabulary.
    #[error("invalid token claims: {0}")]
    MalformedClaims(String),
}

impl TokenError {
    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::MalformedToken(_) => "malformed_token",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::IssuerMismatch { .. } => "issuer_mismatch",
            TokenError::Expired { .. } => "expired",
            TokenError::MalformedClaims(_) => "malformed_claims",
        }
    }
}

// =============================================================================
// AuthError
// =============================================================================

/// Externally visible failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorClass {
    /// Missing, invalid or expired credentials (HTTP 401).
    Authentication,
    /// Valid credentials without the required capability (HTTP 403).
    Authorization,
    /// Token issuance failed (HTTP 500).
    Internal,
}

/// Errors produced by the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header, or one without the `Bearer ` prefix.
    #[error("Authentication required")]
    MissingCredentials,

    /// The bearer token failed verification.
    #[error("JWT verification failed: {0}")]
    AuthenticationFailed(#[from] TokenError),

    /// `authorize` ran without a context from a prior `authenticate`.
    #[error("Authentication context not found")]
    ContextMissing,

    /// The authenticated principal lacks the required permission(s).
    #[error("Insufficient permissions. {}", RequiredDisplay(.required))]
    InsufficientPermissions {
        /// Permissions that were required.
        required: PermissionRequirement,
        /// How `required` was evaluated.
        mode: MatchMode,
    },

    /// The codec could not produce a token.
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),
}

impl AuthError {
    /// Returns the externally visible class of this error.
    pub fn class(&self) -> AuthErrorClass {
        match self {
            AuthError::MissingCredentials | AuthError::AuthenticationFailed(_) => {
                AuthErrorClass::Authentication
            }
            AuthError::ContextMissing | AuthError::InsufficientPermissions { .. } => {
                AuthErrorClass::Authorization
            }
            AuthError::SigningFailed(_) => AuthErrorClass::Internal,
        }
    }

    /// Returns the token failure, if this is an authentication failure.
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            AuthError::AuthenticationFailed(e) => Some(e),
            _ => None,
        }
    }

    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::AuthenticationFailed(e) => e.kind(),
            AuthError::ContextMissing => "context_missing",
            AuthError::InsufficientPermissions { .. } => "insufficient_permissions",
            AuthError::SigningFailed(_) => "signing_failed",
        }
    }
}

struct RequiredDisplay<'a>(&'a PermissionRequirement);

impl fmt::Display for RequiredDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .0
            .permissions()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        match (self.0.permissions().len(), self.0.mode()) {
            (1, _) => write!(f, "Required: {}", names),
            (_, MatchMode::All) => write!(f, "Required all of: {}", names),
            (_, MatchMode::Any) => write!(f, "Required any of: {}", names),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
