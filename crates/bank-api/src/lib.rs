// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # bank-api
//!
//! HTTP service and authorization core for the bank service.
//!
//! Every protected request carries a bearer JWT. The token is verified
//! against the shared secret, the expected issuer and its expiry, turned
//! into an [`AuthContext`] and checked against the permissions a route
//! requires.
//!
//! - [`auth`]: claims, codec, auth gate and permission checks
//! - [`middleware`]: tower layers for authentication and authorization
//! - [`users`]: account registration, login and profiles
//! - [`server`]: router assembly and serving

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;
pub mod users;

pub use auth::{
    AuthContext, AuthError, AuthGate, Claims, ClaimsInput, JwtCodec, JwtConfig, MatchMode,
    Permission, PermissionRequirement, PermissionSet, TokenError,
};
pub use config::{ApiConfig, ConfigError, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
