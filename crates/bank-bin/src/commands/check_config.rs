// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check-config` command.

use bank_api::auth::{algorithm_name, RECOMMENDED_SECRET_LEN};
use bank_api::ApiConfig;
use serde_json::json;

use crate::cli::{CheckConfigArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the `check-config` command.
pub fn check_config(_cli: &Cli, args: CheckConfigArgs) -> BinResult<()> {
    let config = ApiConfig::from_env()?;
    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("Configuration is valid");
            println!("  Listen:       {}", config.socket_addr());
            println!("  Environment:  {}", config.environment);
            println!("  Issuer:       {}", config.jwt.issuer);
            println!("  Algorithm:    {}", algorithm_name(config.jwt.algorithm));
            println!(
                "  Expiration:   {}",
                humantime::format_duration(config.jwt.expiration)
            );
            for warning in &warnings {
                println!("  Warning:      {}", warning);
            }
            if args.show_config {
                println!();
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        OutputFormat::Json => {
            let mut output = json!({
                "valid": true,
                "warnings": warnings,
            });
            if args.show_config {
                output["config"] = serde_json::to_value(&config)?;
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "{} warning(s) in strict mode",
            warnings.len()
        )));
    }

    Ok(())
}

fn collect_warnings(config: &ApiConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.jwt.secret.len() < RECOMMENDED_SECRET_LEN {
        warnings.push(format!(
            "JWT_SECRET is shorter than {} bytes",
            RECOMMENDED_SECRET_LEN
        ));
    }
    if config.is_production() && config.cors.allowed_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allows any origin in production".to_string());
    }
    if config.jwt.expiration.is_zero() {
        warnings.push("JWT_EXPIRATION is zero; every token is born expired".to_string());
    }

    warnings
}

// =============================================================================
// Tests
// =============================================================================
