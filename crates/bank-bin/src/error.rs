// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the service binary.

use thiserror::Error;

/// Result type alias for bank-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the service binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration could not be loaded or failed validation.
    #[error("Config error: {0}")]
    Config(#[from] bank_api::ConfigError),

    /// Configuration loaded but was rejected by a command.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Server error.
    #[error("API error: {0}")]
    Api(#[from] bank_api::ApiError),

    /// Token signing error.
    #[error("Token error: {0}")]
    Auth(#[from] bank_api::AuthError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Configuration(_) => 1,
            Self::Api(_) => 2,
            Self::Auth(_) => 3,
            Self::Io(_) => 4,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BinError::config("test error");
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_error_with_context() {
        let err = BinError::config("inner error").with_context("outer context");
        assert_eq!(err.to_string(), "outer context: Configuration error: inner error");
    }

    #[test]
    fn test_missing_secret_exits_non_zero() {
        let err = BinError::from(bank_api::ConfigError::missing("JWT_SECRET"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("test").exit_code(), 1);
        assert_eq!(BinError::from(bank_api::ApiError::internal("x")).exit_code(), 2);
        assert_eq!(BinError::from(bank_api::AuthError::SigningFailed("key".into())).exit_code(), 3);
        assert_eq!(BinError::io("test").exit_code(), 4);
        assert_eq!(
            BinError::io("test").with_context("writing token").exit_code(),
            4
        );
    }
}
