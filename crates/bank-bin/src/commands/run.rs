// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use bank_api::{ApiConfig, ApiServerBuilder};
use tracing::{info, warn};

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

/// Executes the `run` command to start the service.
pub async fn run(_cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!(version = bank_api::VERSION, "Starting bank service");

    let mut config = ApiConfig::from_env()?;
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    let shutdown_timeout = config.shutdown_timeout;

    let server = ApiServerBuilder::new().config(config).build()?;

    let coordinator = ShutdownCoordinator::new();
    tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.wait_for_os_signal().await }
    });

    let serve = server.run_with_shutdown(coordinator.shutdown_signal());
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => result?,
        _ = coordinator.shutdown_signal() => {
            // In-flight requests get the shutdown timeout to drain.
            match tokio::time::timeout(shutdown_timeout, &mut serve).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout = ?shutdown_timeout,
                    "Graceful shutdown timed out, dropping open connections"
                ),
            }
        }
    }

    info!("Bank service stopped");
    Ok(())
}
