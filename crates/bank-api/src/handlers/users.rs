// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User account handlers.

use axum::{extract::State, response::IntoResponse};

use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::{LoginRequest, RegisterRequest, UpdateProfileRequest};

/// POST /app/users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.users().register(request).await?;
    Ok(ApiResponse::created(profile))
}

/// POST /app/users/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state.users().login(request).await?;
    Ok(ApiResponse::success(response))
}

/// GET /app/users/profile
///
/// The token subject is the user id.
pub async fn get_profile(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    let profile = state.users().get_profile(&ctx.identity).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /app/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.users().update_profile(&ctx.identity, request).await?;
    Ok(ApiResponse::success(profile))
}
