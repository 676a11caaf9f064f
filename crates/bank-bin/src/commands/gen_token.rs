// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-token` command.

use bank_api::{ClaimsInput, JwtCodec, JwtConfig};
use serde_json::json;

use crate::cli::{Cli, GenTokenArgs, OutputFormat};
use crate::error::BinResult;

/// Executes the `gen-token` command.
///
/// Signs with the same secret, issuer and lifetime the server would use.
pub fn gen_token(_cli: &Cli, args: GenTokenArgs) -> BinResult<()> {
    let mut config = jwt_config_from_env()?;
    if let Some(expiration) = args.expiration {
        config = config.with_expiration(expiration);
    }

    let codec = JwtCodec::new(config)?;
    let input = build_input(&args);
    let token = codec.sign(&input)?;

    match args.format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => {
            let claims = codec.verify(&token).map_err(bank_api::AuthError::from)?;
            let output = json!({
                "token": token,
                "subject": claims.sub,
                "permissions": claims.permissions.to_names(),
                "expiresAt": claims.expires_at(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn jwt_config_from_env() -> BinResult<JwtConfig> {
    let config = bank_api::ApiConfig::from_env()?;
    Ok(config.jwt)
}

fn build_input(args: &GenTokenArgs) -> ClaimsInput {
    ClaimsInput::new(args.subject.clone())
        .service_type(args.service_type.clone())
        .permissions(args.permissions.iter().copied())
        .environment(args.environment.clone())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bank_api::Permission;
    use clap::Parser;

    use super::*;
    use crate::cli::Commands;

    fn parse(args: &[&str]) -> GenTokenArgs {
        match Cli::parse_from(args).command {
            Some(Commands::GenToken(args)) => args,
            other => panic!("Expected GenToken command, got {:?}", other),
        }
    }

    #[test]
    fn test_build_input_signs_requested_claims() {
        let args = parse(&[
            "bank-service",
            "gen-token",
            "-s",
            "billing-service",
            "-P",
            "banks:write",
            "-e",
            "staging",
        ]);

        let codec = JwtCodec::new(
            JwtConfig::new("a-secret-that-is-at-least-32-bytes-long")
                .with_expiration(Duration::from_secs(60)),
        )
        .unwrap();
        let token = codec.sign(&build_input(&args)).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "billing-service");
        assert_eq!(claims.service_type, "internal");
        assert_eq!(claims.environment, "staging");
        assert!(claims.has_permission(Permission::BanksWrite));
        assert!(!claims.has_permission(Permission::BanksRead));
    }
}
