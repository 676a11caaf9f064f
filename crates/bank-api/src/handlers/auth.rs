// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::response::IntoResponse;

use crate::extractors::Auth;
use crate::response::{ApiResponse, AuthContextResponse};

/// GET /api/auth/context
///
/// Returns what the caller's token grants.
pub async fn current_context(Auth(ctx): Auth) -> impl IntoResponse {
    tracing::debug!(identity = %ctx.identity, request_id = %ctx.request_id, "Context requested");
    ApiResponse::success(AuthContextResponse::from(&ctx))
}
