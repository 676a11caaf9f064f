// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use crate::auth::algorithm_name;
use crate::response::{HealthResponse, JwtHealthResponse, JwtStatus};
use crate::state::AppState;

/// GET /health
///
/// Liveness check. Returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::healthy(state.config.environment.clone()))
}

/// GET /health/jwt
///
/// Reports the loaded token codec. The codec is built at startup, so a
/// running service always has one.
pub async fn jwt_health(State(state): State<AppState>) -> impl IntoResponse {
    let codec = state.codec();

    Json(JwtHealthResponse {
        jwt: JwtStatus {
            status: "healthy".to_string(),
            issuer: codec.issuer().to_string(),
            algorithm: algorithm_name(codec.algorithm()).to_string(),
        },
        service: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
