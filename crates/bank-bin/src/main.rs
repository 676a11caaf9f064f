// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bank service binary.

use bank_bin::error::report_error_and_exit;
use bank_bin::{commands, init_logging, load_env_file, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let env_loaded = match load_env_file(&cli.env_file) {
        Ok(loaded) => loaded,
        Err(e) => report_error_and_exit(e),
    };

    init_logging(cli.effective_log_level(), cli.log_format);
    if env_loaded {
        tracing::debug!(path = %cli.env_file.display(), "Loaded environment file");
    }

    if let Err(e) = commands::execute(cli).await {
        tracing::error!(error = %e, "Command failed");
        report_error_and_exit(e);
    }
}
