// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # bank-bin
//!
//! Command-line entry point for the bank service.
//!
//! - CLI argument parsing with clap
//! - `.env` loading and logging initialization
//! - Graceful shutdown handling
//! - Command implementations (run, gen-token, check-config, version)
//!
//! ## Usage
//!
//! ```bash
//! # Start the service (default command)
//! JWT_SECRET=... bank-service
//!
//! # Mint a token for a backend caller
//! bank-service gen-token --subject billing-service --permission banks:read
//!
//! # Validate configuration
//! bank-service check-config --strict
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads a dotenv file if it exists.
///
/// Variables already set in the process environment win.
pub fn load_env_file(path: &std::path::Path) -> BinResult<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BinError::config(format!(
            "failed to load {}: {}",
            path.display(),
            e
        ))),
    }
}
