// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TokenError;
use super::permission::{Permission, PermissionSet};

/// Verified claims carried by a service token.
///
/// A value of this type is only produced by a successful
/// [`JwtCodec::verify`](super::JwtCodec::verify), so every required field is
/// present and well-typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Required
    // =========================================================================
    /// Issuer (the signing authority).
    pub iss: String,

    /// Subject - service account or user id.
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Principal classification, e.g. `internal`, `external`, `user`.
    pub service_type: String,

    /// Permissions granted for the token's lifetime.
    pub permissions: PermissionSet,

    /// Environment the token was issued for.
    pub environment: String,

    // =========================================================================
    // Sign-time metadata
    // =========================================================================
    /// Issued at time (Unix timestamp, seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Audience. Written when configured, never verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the claims grant the given permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns `true` if `exp` is not strictly after `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

}

// =============================================================================
// ClaimsInput
// =============================================================================

/// Claims supplied by the caller when signing a token.
///
/// The codec fills in `iss`, `exp`, `iat` and `aud` from its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsInput {
    /// Subject - service account or user id.
    pub subject: String,
    /// Principal classification.
    pub service_type: String,
    /// Permissions to grant.
    pub permissions: PermissionSet,
    /// Environment tag.
    pub environment: String,
}

impl ClaimsInput {
    /// Creates input for the given subject with no permissions.
    ///
    /// Defaults to an `internal` service in the `development` environment.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            service_type: "internal".to_string(),
            permissions: PermissionSet::new(),
            environment: "development".to_string(),
        }
    }

    /// Sets the service type.
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Adds a permission.
    pub fn permission(mut self, permission: Permission) -> Self {
        self.permissions.add(permission);
        self
    }

    /// Replaces the permission set.
    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = PermissionSet::from_permissions(permissions);
        self
    }

    /// Sets the environment.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub(crate) fn into_claims(self, issuer: &str, issued_at: i64, expires_at: i64) -> Claims {
        Claims {
            iss: issuer.to_string(),
            sub: self.subject,
            exp: expires_at,
            service_type: self.service_type,
            permissions: self.permissions,
            environment: self.environment,
            iat: Some(issued_at),
            aud: None,
        }
    }
}

// =============================================================================
// UncheckedClaims
// =============================================================================

/// Payload as decoded after the signature check, before claim validation.
///
/// Every field is optional so that each verification step can report its own
/// failure instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UncheckedClaims {
    #[serde(default)]
    iss: Option<Value>,
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    exp: Option<Value>,
    #[serde(default)]
    service_type: Option<Value>,
    #[serde(default)]
    permissions: Option<Value>,
    #[serde(default)]
    environment: Option<Value>,
    #[serde(default)]
    iat: Option<Value>,
    #[serde(default)]
    aud: Option<Value>,
}

impl UncheckedClaims {
    /// Returns the issuer if present and a string.
    pub(crate) fn issuer(&self) -> Option<&str> {
        self.iss.as_ref().and_then(Value::as_str)
    }

    /// Returns the expiry if present and numeric.
    pub(crate) fn expiry(&self) -> Option<i64> {
        self.exp.as_ref().and_then(numeric_date)
    }

    /// Checks the full claim structure.
    pub(crate) fn into_claims(self) -> Result<Claims, TokenError> {
        let iss = required_string(self.iss, "iss")?;
        let sub = required_string(self.sub, "sub")?;
        let exp = self
            .exp
            .as_ref()
            .and_then(numeric_date)
            .ok_or_else(|| missing_or_mistyped("exp"))?;
        let service_type = required_string(self.service_type, "service_type")?;
        let permissions = permission_set(self.permissions)?;
        let environment = required_string(self.environment, "environment")?;

        Ok(Claims {
            iss,
            sub,
            exp,
            service_type,
            permissions,
            environment,
            iat: self.iat.as_ref().and_then(numeric_date),
            aud: self.aud.and_then(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            }),
        })
    }
}

/// Reads a NumericDate. Fractional seconds are truncated toward zero.
fn numeric_date(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

fn missing_or_mistyped(field: &str) -> TokenError {
    TokenError::MalformedClaims(format!("'{}' is missing or has the wrong type", field))
}

fn required_string(value: Option<Value>, field: &str) -> Result<String, TokenError> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(missing_or_mistyped(field)),
    }
}

fn permission_set(value: Option<Value>) -> Result<PermissionSet, TokenError> {
    let Some(Value::Array(items)) = value else {
        return Err(missing_or_mistyped("permissions"));
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(Permission::parse)
                .ok_or_else(|| TokenError::MalformedClaims(format!("unknown permission {}", item)))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unchecked(value: Value) -> UncheckedClaims {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> Value {
        json!({
            "iss": "bank-service",
            "sub": "svc-1",
            "exp": 2_000_000_000i64,
            "service_type": "internal",
            "permissions": ["banks:read"],
            "environment": "test",
            "iat": 1_999_999_000i64,
        })
    }

    #[test]
    fn test_claims_input_builder() {
        let input = ClaimsInput::new("svc-1")
            .service_type("external")
            .permission(Permission::BanksRead)
            .environment("sandbox");

        assert_eq!(input.subject, "svc-1");
        assert_eq!(input.service_type, "external");
        assert!(input.permissions.contains(Permission::BanksRead));
        assert_eq!(input.environment, "sandbox");

        let claims = input.into_claims("bank-service", 100, 160);
        assert_eq!(claims.exp, 160);
        assert_eq!(claims.iat, Some(100));
        assert_eq!(claims.iss, "bank-service");
    }

    #[test]
    fn test_unchecked_claims_complete() {
        let claims = unchecked(complete()).into_claims().unwrap();

        assert_eq!(claims.subject(), "svc-1");
        assert!(claims.has_permission(Permission::BanksRead));
        assert!(!claims.has_permission(Permission::BanksWrite));
        assert_eq!(claims.iat, Some(1_999_999_000));
        assert!(claims.aud.is_none());
    }

    #[test]
    fn test_unchecked_claims_missing_field() {
        for field in ["sub", "exp", "service_type", "permissions", "environment"] {
            let mut value = complete();
            value.as_object_mut().unwrap().remove(field);

            let err = unchecked(value).into_claims().unwrap_err();
            assert!(
                matches!(err, TokenError::MalformedClaims(ref m) if m.contains(field)),
                "field {} gave {:?}",
                field,
                err
            );
        }
    }

    #[test]
    fn test_unchecked_claims_mistyped_field() {
        let mut value = complete();
        value["exp"] = json!("tomorrow");
        assert!(matches!(
            unchecked(value).into_claims(),
            Err(TokenError::MalformedClaims(_))
        ));

        let mut value = complete();
        value["permissions"] = json!("banks:read");
        assert!(matches!(
            unchecked(value).into_claims(),
            Err(TokenError::MalformedClaims(_))
        ));
    }

    #[test]
    fn test_unchecked_claims_fractional_dates() {
        let mut value = complete();
        value["exp"] = json!(2_000_000_000.9);
        value["iat"] = json!(1_999_999_000.5);

        let unchecked = unchecked(value);
        assert_eq!(unchecked.expiry(), Some(2_000_000_000));

        let claims = unchecked.into_claims().unwrap();
        assert_eq!(claims.exp, 2_000_000_000);
        assert_eq!(claims.iat, Some(1_999_999_000));
    }

    #[test]
    fn test_unchecked_claims_unknown_permission() {
        let mut value = complete();
        value["permissions"] = json!(["banks:read", "banks:admin"]);

        let err = unchecked(value).into_claims().unwrap_err();
        assert!(matches!(err, TokenError::MalformedClaims(ref m) if m.contains("banks:admin")));
    }

    #[test]
    fn test_claims_expiry_is_strict() {
        let claims = unchecked(complete()).into_claims().unwrap();

        assert!(claims.is_expired_at(claims.exp));
        assert!(claims.is_expired_at(claims.exp + 1));
        assert!(!claims.is_expired_at(claims.exp - 1));
    }
}
