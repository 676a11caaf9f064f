// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User registration, login and profiles.

mod model;
mod password;
mod repository;
mod service;
pub mod validator;

use thiserror::Error;

use crate::auth::AuthError;
use crate::error::ValidationErrors;

pub use model::{
    LoginRequest, LoginResponse, LoginUser, NewUser, RegisterRequest, UpdateProfileRequest, User,
    UserProfile, UserUpdate,
};
pub use password::{hash_password, verify_password};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{UserService, USER_SERVICE_TYPE};

/// Errors from account operations.
///
/// Display strings are the messages clients see.
#[derive(Debug, Error)]
pub enum UserError {
    /// One or more input fields are invalid.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The email is already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("Account is deactivated")]
    AccountDeactivated,

    /// No account for the given id.
    #[error("User not found")]
    NotFound,

    /// A profile update carried no fields.
    #[error("No updates provided")]
    NoUpdates,

    /// Token issuance failed.
    #[error(transparent)]
    Token(#[from] AuthError),

    /// Hashing or hash parsing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// The repository backend failed.
    #[error("User storage failed: {0}")]
    Storage(String),
}
