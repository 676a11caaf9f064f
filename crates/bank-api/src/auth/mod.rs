// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Permission vocabulary and permission sets
//! - JWT signing and verification
//! - Authentication context
//! - The authorization gate

mod claims;
mod context;
pub mod error;
mod gate;
mod jwt;
pub mod permission;

pub use claims::{Claims, ClaimsInput};
pub use context::AuthContext;
pub use error::{AuthError, AuthErrorClass, AuthResult, TokenError};
pub use gate::{authorize, AuthGate, MatchMode, PermissionRequirement, BEARER_PREFIX};
pub use jwt::{algorithm_name, parse_algorithm, JwtCodec, JwtConfig, RECOMMENDED_SECRET_LEN};
pub use permission::{Permission, PermissionSet, UnknownPermission};
