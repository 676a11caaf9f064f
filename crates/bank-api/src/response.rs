// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthContext;

// =============================================================================
// ApiResponse
// =============================================================================

/// Success envelope: `{ "success": true, "data": ... }`.
///
/// Failures use [`ApiError`](crate::error::ApiError) instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Response data.
    pub data: T,
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl<T> ApiResponse<T> {
    /// Creates a 200 response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            status: None,
        }
    }

    /// Creates a 201 response.
    pub fn created(data: T) -> Self {
        Self {
            success: true,
            data,
            status: Some(StatusCode::CREATED),
        }
    }

    /// Returns the status the response is sent with.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Typed Responses
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Check time.
    pub timestamp: DateTime<Utc>,
    /// Version string.
    pub version: String,
    /// Deployment environment.
    pub environment: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy(environment: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: crate::VERSION.to_string(),
            environment: environment.into(),
        }
    }
}

/// Token codec health response.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHealthResponse {
    /// Codec status.
    pub jwt: JwtStatus,
    /// Service name.
    pub service: String,
    /// Check time.
    pub timestamp: DateTime<Utc>,
}

/// Status of the token codec.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtStatus {
    /// `healthy` when the codec is loaded.
    pub status: String,
    /// Issuer written into and required on tokens.
    pub issuer: String,
    /// Signing algorithm.
    pub algorithm: String,
}

/// What the caller's token says about them.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthContextResponse {
    /// Token subject.
    pub identity: String,
    /// Principal classification.
    pub service_type: String,
    /// Granted permissions, sorted.
    pub permissions: Vec<String>,
    /// Environment tag.
    pub environment: String,
    /// Token expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Request correlation id.
    pub request_id: Uuid,
}

impl From<&AuthContext> for AuthContextResponse {
    fn from(ctx: &AuthContext) -> Self {
        Self {
            identity: ctx.identity.clone(),
            service_type: ctx.service_type.clone(),
            permissions: ctx
                .permissions
                .to_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            environment: ctx.environment.clone(),
            expires_at: ctx.expires_at(),
            request_id: ctx.request_id,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, 42);
        assert_eq!(response.status(), StatusCode::OK);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 42 }));
    }

    #[test]
    fn test_api_response_created() {
        let response = ApiResponse::created("x").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy("test");
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, crate::VERSION);
        assert_eq!(health.environment, "test");
    }
}
