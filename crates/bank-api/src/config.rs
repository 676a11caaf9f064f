// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.
//!
//! Loaded once at startup from environment variables:
//!
//! | Variable           | Default         |
//! |--------------------|-----------------|
//! | `HOST`             | `0.0.0.0`       |
//! | `PORT`             | `3000`          |
//! | `APP_ENV`          | `development`   |
//! | `REQUEST_TIMEOUT`  | `30s`           |
//! | `USER_PERMISSIONS` | `banks:read`    |
//! | `JWT_SECRET`       | required        |
//! | `JWT_ALGORITHM`    | `HS256`         |
//! | `JWT_ISSUER`       | `bank-service`  |
//! | `JWT_AUDIENCE`     | unset           |
//! | `JWT_EXPIRATION`   | `24h`           |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{parse_algorithm, JwtConfig, Permission, PermissionSet};

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// Variable name.
        field: String,
    },

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {message}")]
    Validation {
        /// Description.
        message: String,
    },

    /// A setting could not be parsed.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Variable name.
        field: String,
        /// Description.
        message: String,
    },
}

impl ConfigError {
    /// Creates a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Configuration for the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Deployment environment (`development`, `test`, `sandbox`, `production`).
    pub environment: String,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Permissions granted to user login tokens.
    pub user_permissions: PermissionSet,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            environment: "development".to_string(),
            cors: CorsConfig::default(),
            jwt: JwtConfig::default(),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            user_permissions: PermissionSet::from([Permission::BanksRead]),
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. Values are trimmed, except
    /// `JWT_SECRET`, which is used byte for byte.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host
                .parse()
                .map_err(|e| ConfigError::invalid_value("HOST", format!("{e}")))?;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::invalid_value("PORT", format!("{e}")))?;
        }
        if let Some(env) = get("APP_ENV") {
            config.environment = env;
        }
        if let Some(timeout) = get("REQUEST_TIMEOUT") {
            config.request_timeout = parse_duration("REQUEST_TIMEOUT", &timeout)?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(permissions) = get("USER_PERMISSIONS") {
            config.user_permissions = parse_permissions("USER_PERMISSIONS", &permissions)?;
        }

        config.jwt.secret = lookup("JWT_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("JWT_SECRET"))?;
        if let Some(algorithm) = get("JWT_ALGORITHM") {
            config.jwt.algorithm = parse_algorithm(&algorithm).ok_or_else(|| {
                ConfigError::invalid_value(
                    "JWT_ALGORITHM",
                    format!("'{algorithm}' is not one of HS256, HS384, HS512"),
                )
            })?;
        }
        if let Some(issuer) = get("JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }
        config.jwt.audience = get("JWT_AUDIENCE");
        if let Some(expiration) = get("JWT_EXPIRATION") {
            config.jwt.expiration = parse_duration("JWT_EXPIRATION", &expiration)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid_value(
                "REQUEST_TIMEOUT",
                "must be greater than zero",
            ));
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::validation("max_body_size must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the host address.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the JWT configuration.
    pub fn with_jwt(mut self, jwt: JwtConfig) -> Self {
        self.jwt = jwt;
        self
    }

    /// Sets the permissions granted to user tokens.
    pub fn with_user_permissions(mut self, permissions: PermissionSet) -> Self {
        self.user_permissions = permissions;
        self
    }

    /// Returns `true` for the production environment.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::invalid_value(field, e.to_string()))
}

fn parse_permissions(field: &str, value: &str) -> Result<PermissionSet, ConfigError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Permission>()
                .map_err(|e| ConfigError::invalid_value(field, e.to_string()))
        })
        .collect()
}

// =============================================================================
// CorsConfig
// =============================================================================

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `*` allows any.
    pub allowed_origins: Vec<String>,
    /// Allowed methods.
    pub allowed_methods: Vec<String>,
    /// Allowed headers.
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache (seconds).
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-Request-ID".to_string(),
            ],
            max_age: 3600,
        }
    }
}

impl CorsConfig {
    /// Creates a restrictive CORS configuration for production.
    pub fn strict(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: origins,
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "PUT".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 3600,
        }
    }
}

// =============================================================================
// humantime_serde module for Duration
// =============================================================================

pub(crate) mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jsonwebtoken::Algorithm;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const SECRET: &str = "config-test-secret-that-is-long-enough";

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.jwt.issuer, "bank-service");
        assert_eq!(config.jwt.algorithm, Algorithm::HS256);
        assert_eq!(config.jwt.expiration, Duration::from_secs(24 * 3600));
        assert!(config.jwt.audience.is_none());
        assert_eq!(config.user_permissions.to_names(), vec!["banks:read"]);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::missing("JWT_SECRET")
        );
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("APP_ENV", "sandbox"),
            ("REQUEST_TIMEOUT", "5s"),
            ("USER_PERMISSIONS", "banks:read, banks:write"),
            ("JWT_ALGORITHM", "HS384"),
            ("JWT_ISSUER", "bank-auth"),
            ("JWT_AUDIENCE", "bank-clients"),
            ("JWT_EXPIRATION", "1h"),
            ("CORS_ORIGINS", "https://bank.example, https://ops.bank.example"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.environment, "sandbox");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.user_permissions.contains(Permission::BanksWrite));
        assert_eq!(config.jwt.algorithm, Algorithm::HS384);
        assert_eq!(config.jwt.issuer, "bank-auth");
        assert_eq!(config.jwt.audience.as_deref(), Some("bank-clients"));
        assert_eq!(config.jwt.expiration, Duration::from_secs(3600));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://bank.example", "https://ops.bank.example"]
        );
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            ("PORT", "http"),
            ("HOST", "localhost:80"),
            ("JWT_ALGORITHM", "RS256"),
            ("JWT_EXPIRATION", "tomorrow"),
            ("USER_PERMISSIONS", "banks:read,banks:admin"),
            ("REQUEST_TIMEOUT", "0s"),
            ("JWT_EXPIRATION", "1000years"),
        ];

        for (key, value) in cases {
            let err = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET), (key, value)]))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref field, .. } if field == key),
                "{key}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_secret_is_not_trimmed() {
        let padded = format!(" {SECRET}\n");
        let config = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", padded.as_str())])).unwrap();

        assert_eq!(config.jwt.secret, padded);
    }

    #[test]
    fn test_zero_expiration_is_allowed() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRATION", "0s"),
        ]))
        .unwrap();
        assert!(config.jwt.expiration.is_zero());
    }

    #[test]
    fn test_duration_serde() {
        let json = serde_json::to_value(ApiConfig::default()).unwrap();
        assert_eq!(json["request_timeout"], "30s");
        assert_eq!(json["jwt"]["expiration"], "1day");
        assert!(json["jwt"].get("secret").is_none());
    }
}
