// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use bank_api::Permission;

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Bank Service");
    println!();
    println!("Version Information:");
    println!("  bank-bin: {}", crate::VERSION);
    println!("  bank-api: {}", bank_api::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("Token Support:");
    println!("  Algorithms:   HS256, HS384, HS512");
    let permissions: Vec<&str> = Permission::all().iter().map(|p| p.as_str()).collect();
    println!("  Permissions:  {}", permissions.join(", "));
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
