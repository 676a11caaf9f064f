// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built configuration, codecs and tokens so every suite signs with the
//! same secret and issuer.

use std::sync::Arc;
use std::time::Duration;

use bank_api::users::{LoginRequest, RegisterRequest};
use bank_api::{ApiConfig, AuthGate, ClaimsInput, JwtCodec, JwtConfig, Permission};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::Value;

/// Shared secret used by every fixture.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Issuer configured on every fixture codec.
pub const TEST_ISSUER: &str = "bank-service";

/// Password that satisfies the registration rules.
pub const TEST_PASSWORD: &str = "Str0ngPassword";

// =============================================================================
// Configuration Fixtures
// =============================================================================

/// Configuration fixtures.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// JWT configuration with a one-hour lifetime.
    pub fn jwt() -> JwtConfig {
        JwtConfig::new(TEST_SECRET)
            .with_issuer(TEST_ISSUER)
            .with_expiration(Duration::from_secs(3600))
    }

    /// JWT configuration whose tokens are expired at birth.
    pub fn jwt_zero_ttl() -> JwtConfig {
        Self::jwt().with_expiration(Duration::ZERO)
    }

    /// Server configuration in the `test` environment.
    pub fn api() -> ApiConfig {
        ApiConfig::default()
            .with_environment("test")
            .with_jwt(Self::jwt())
    }
}

// =============================================================================
// Codec Fixtures
// =============================================================================

/// Codec and gate fixtures.
pub struct CodecFixtures;

impl CodecFixtures {
    /// Codec built from [`ConfigFixtures::jwt`].
    pub fn codec() -> Arc<JwtCodec> {
        Arc::new(JwtCodec::new(ConfigFixtures::jwt()).expect("fixture config is valid"))
    }

    /// Codec built from an arbitrary configuration.
    pub fn codec_with(config: JwtConfig) -> Arc<JwtCodec> {
        Arc::new(JwtCodec::new(config).expect("fixture config is valid"))
    }

    /// Gate over [`CodecFixtures::codec`].
    pub fn gate() -> AuthGate {
        AuthGate::new(Self::codec())
    }
}

// =============================================================================
// Token Fixtures
// =============================================================================

/// Token fixtures.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Claims for an internal service in the `test` environment.
    pub fn service_input(subject: &str, permissions: &[Permission]) -> ClaimsInput {
        ClaimsInput::new(subject)
            .service_type("internal")
            .permissions(permissions.iter().copied())
            .environment("test")
    }

    /// Token granting only `banks:read`.
    pub fn reader() -> String {
        Self::sign(&Self::service_input("svc-reader", &[Permission::BanksRead]))
    }

    /// Token granting only `banks:write`.
    pub fn writer() -> String {
        Self::sign(&Self::service_input("svc-writer", &[Permission::BanksWrite]))
    }

    /// Token granting every permission.
    pub fn admin() -> String {
        Self::sign(&Self::service_input("svc-admin", Permission::all()))
    }

    /// Token granting nothing.
    pub fn no_permissions() -> String {
        Self::sign(&Self::service_input("svc-none", &[]))
    }

    /// Signs with the fixture codec.
    pub fn sign(input: &ClaimsInput) -> String {
        CodecFixtures::codec()
            .sign(input)
            .expect("fixture signing succeeds")
    }

    /// Signs an arbitrary JSON payload with the fixture secret, bypassing
    /// the codec's claim construction.
    pub fn forge(payload: &Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("forging succeeds")
    }

    /// A complete, valid payload that tests can then mutate.
    pub fn valid_payload() -> Value {
        let exp = chrono::Utc::now().timestamp() + 3600;
        serde_json::json!({
            "iss": TEST_ISSUER,
            "sub": "svc-forged",
            "exp": exp,
            "service_type": "internal",
            "permissions": ["banks:read"],
            "environment": "test",
        })
    }

    /// Formats an `Authorization` header value.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

// =============================================================================
// User Fixtures
// =============================================================================

/// Account request fixtures.
pub struct UserFixtures;

impl UserFixtures {
    /// A valid registration request for `email`.
    pub fn register(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    /// A login request with the fixture password.
    pub fn login(email: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        }
    }
}
