// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the HTTP service (default)
//! - `gen-token`: Mint a service token with the configured secret
//! - `check-config`: Load and validate configuration from the environment
//! - `version`: Show version information

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use bank_api::Permission;
use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Bank service
///
/// Catalog and account service for banking-API connector metadata. All
/// configuration is read from the environment (and an optional `.env` file).
#[derive(Parser, Debug)]
#[command(
    name = "bank-service",
    author = "Sylvex <contact@sylvex.io>",
    version = bank_api::VERSION,
    about = "Bank service with JWT authorization",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Dotenv file to load before reading the environment
    #[arg(long, default_value = ".env", env = "BANK_ENV_FILE", global = true)]
    pub env_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "BANK_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "BANK_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP service
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Mint a signed token
    ///
    /// Signs a token with the configured secret, issuer and lifetime. Useful
    /// for service-to-service callers and local testing.
    #[command(name = "gen-token")]
    GenToken(GenTokenArgs),

    /// Validate configuration
    ///
    /// Loads configuration from the environment without starting the server.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the bind address
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `gen-token` command.
#[derive(Args, Debug, Clone)]
pub struct GenTokenArgs {
    /// Token subject (service name or user id)
    #[arg(short, long)]
    pub subject: String,

    /// Kind of caller
    #[arg(long, default_value = "internal")]
    pub service_type: String,

    /// Permission to grant; repeat for several
    #[arg(short = 'P', long = "permission")]
    pub permissions: Vec<Permission>,

    /// Deployment environment written into the token
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Override the configured lifetime (e.g. "1h", "30m")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub expiration: Option<Duration>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `check-config` command.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckConfigArgs {
    /// Show the loaded configuration (secret omitted)
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for the result
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
