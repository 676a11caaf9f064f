// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT signing and verification.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::claims::{Claims, ClaimsInput, UncheckedClaims};
use super::error::{AuthError, AuthResult, TokenError};
use crate::config::ConfigError;

/// Minimum recommended secret length in bytes.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (ten years).
pub const MAX_EXPIRATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer. Written into every token and required on verification.
    pub issuer: String,
    /// Token audience. Written when set, never verified.
    pub audience: Option<String>,
    /// Token lifetime.
    #[serde(with = "crate::config::humantime_serde")]
    pub expiration: Duration,
    /// Algorithm to use for signing.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by user
            issuer: "bank-service".to_string(),
            audience: None,
            expiration: Duration::from_secs(24 * 60 * 60),
            algorithm: Algorithm::HS256,
        }
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the token lifetime.
    pub fn with_expiration(mut self, duration: Duration) -> Self {
        self.expiration = duration;
        self
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::missing("JWT_SECRET"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::validation("JWT issuer must not be empty"));
        }
        if !is_hmac(self.algorithm) {
            return Err(ConfigError::invalid_value(
                "JWT_ALGORITHM",
                format!("{:?} needs an asymmetric key; only HS256, HS384 and HS512 are supported", self.algorithm),
            ));
        }
        if self.expiration > MAX_EXPIRATION {
            return Err(ConfigError::invalid_value(
                "JWT_EXPIRATION",
                format!("must not exceed {}", humantime::format_duration(MAX_EXPIRATION)),
            ));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = self.secret.len(),
                "JWT secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration", &self.expiration)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// Parses an HMAC algorithm name (`HS256`, `HS384`, `HS512`).
pub fn parse_algorithm(name: &str) -> Option<Algorithm> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

/// Returns the JOSE name of an algorithm.
pub fn algorithm_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::HS256 => "HS256",
        Algorithm::HS384 => "HS384",
        Algorithm::HS512 => "HS512",
        Algorithm::RS256 => "RS256",
        Algorithm::RS384 => "RS384",
        Algorithm::RS512 => "RS512",
        Algorithm::ES256 => "ES256",
        Algorithm::ES384 => "ES384",
        Algorithm::PS256 => "PS256",
        Algorithm::PS384 => "PS384",
        Algorithm::PS512 => "PS512",
        Algorithm::EdDSA => "EdDSA",
    }
}

// =============================================================================
// JwtCodec
// =============================================================================

/// Signs and verifies service tokens.
///
/// Owns the key material for the process lifetime. Built once at startup and
/// shared behind an `Arc`; all methods take `&self`.
#[derive(Clone)]
pub struct JwtCodec {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtCodec {
    /// Creates a codec from a validated configuration.
    pub fn new(config: JwtConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Only the signature and algorithm are checked by the library. Issuer,
        // expiry and claim structure are checked in `verify` so each failure
        // keeps its own kind.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs a token for the given input.
    ///
    /// The issuer, audience and lifetime come from the configuration.
    pub fn sign(&self, input: &ClaimsInput) -> AuthResult<String> {
        let claims = self.claims_for(input, Utc::now().timestamp())?;
        self.encode(&claims)
    }

    /// Verifies a compact token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Returns the configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.config.expiration
    }

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }

    /// Returns the configured audience, if any.
    pub fn audience(&self) -> Option<&str> {
        self.config.audience.as_deref()
    }

    /// Returns the signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    fn claims_for(&self, input: &ClaimsInput, now: i64) -> AuthResult<Claims> {
        let expires_at = i64::try_from(self.config.expiration.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                AuthError::SigningFailed(format!(
                    "expiration {:?} overflows the token timestamp",
                    self.config.expiration
                ))
            })?;

        let mut claims = input.clone().into_claims(&self.config.issuer, now, expires_at);
        claims.aud = self.config.audience.clone();
        Ok(claims)
    }

    fn encode(&self, claims: &Claims) -> AuthResult<String> {
        let header = Header::new(self.config.algorithm);

        encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, subject = %claims.sub, "Failed to sign token");
            AuthError::SigningFailed(e.to_string())
        })
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        check_shape(token)?;

        decode_header(token).map_err(|e| TokenError::MalformedToken(format!("bad header: {}", e)))?;

        let unchecked = decode::<UncheckedClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
                ErrorKind::InvalidToken | ErrorKind::Base64(_) => {
                    TokenError::MalformedToken(e.to_string())
                }
                _ => TokenError::MalformedClaims(e.to_string()),
            })?;

        match unchecked.issuer() {
            Some(iss) if iss == self.config.issuer => {}
            other => {
                return Err(TokenError::IssuerMismatch {
                    actual: other.map(str::to_string),
                });
            }
        }

        if let Some(exp) = unchecked.expiry() {
            if exp <= now {
                return Err(TokenError::Expired { expired_at: exp });
            }
        }

        unchecked.into_claims()
    }
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &self.config.algorithm)
            .field("expiration", &self.config.expiration)
            .finish()
    }
}

/// Rejects anything that is not three non-empty dot-separated segments.
fn check_shape(token: &str) -> Result<(), TokenError> {
    if token.is_empty() {
        return Err(TokenError::MalformedToken("empty token".to_string()));
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::MalformedToken("empty segment".to_string()));
    }
    Ok(())
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(super::algorithm_name(*algorithm))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_algorithm(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("Unsupported algorithm: {}", s))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
