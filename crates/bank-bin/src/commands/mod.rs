// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the HTTP service
//! - `gen-token`: Mint a signed token
//! - `check-config`: Validate configuration
//! - `version`: Show version information

mod check_config;
mod gen_token;
mod run;
mod version;

pub use check_config::check_config;
pub use gen_token::gen_token;
pub use run::run;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::GenToken(args) => gen_token::gen_token(&cli, args),
        Commands::CheckConfig(args) => check_config::check_config(&cli, args),
        Commands::Version => version::version(&cli),
    }
}
