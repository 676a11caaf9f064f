// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Builds the full router in-process and drives it request by request. No
//! socket is bound, so `ConnectInfo` is absent and contexts carry no client IP.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bank_api::extractors::Auth;
use bank_api::{require_permission, ApiConfig, ApiServerBuilder, AppState, Permission};

use super::fixtures::ConfigFixtures;

// =============================================================================
// Catalog Stand-in
// =============================================================================

/// Routes mounted behind permission layers, standing in for the bank catalog.
///
/// - `GET /api/banks`: `banks:read`
/// - `POST /api/banks`: `banks:write`
/// - `DELETE /api/banks/{id}`: all of `banks:read`, `banks:write`
/// - `GET /api/banks/search`: any of `banks:read`, `banks:write`
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/banks",
            get(list_banks).route_layer(require_permission!(Permission::BanksRead)),
        )
        .route(
            "/api/banks",
            post(create_bank).route_layer(require_permission!(Permission::BanksWrite)),
        )
        .route(
            "/api/banks/{id}",
            delete(delete_bank).route_layer(require_permission!(
                all: Permission::BanksRead,
                Permission::BanksWrite
            )),
        )
        .route(
            "/api/banks/search",
            get(list_banks).route_layer(require_permission!(
                any: Permission::BanksRead,
                Permission::BanksWrite
            )),
        )
}

async fn list_banks(Auth(ctx): Auth) -> Json<Value> {
    Json(json!({ "success": true, "data": [], "caller": ctx.identity }))
}

async fn create_bank(Auth(ctx): Auth) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "caller": ctx.identity })),
    )
}

async fn delete_bank(Auth(ctx): Auth) -> Json<Value> {
    Json(json!({ "success": true, "caller": ctx.identity }))
}

// =============================================================================
// Test App
// =============================================================================

/// A response with its body parsed as JSON (`Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Parsed body.
    pub body: Value,
}

/// In-process application under test.
pub struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    /// Builds the app from [`ConfigFixtures::api`].
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::api())
    }

    /// Builds the app from an arbitrary configuration.
    pub fn with_config(config: ApiConfig) -> Self {
        Self::with_routes(config, catalog_routes())
    }

    /// Builds the app with custom extension routes instead of the catalog.
    pub fn with_routes(config: ApiConfig, routes: Router<AppState>) -> Self {
        let server = ApiServerBuilder::new()
            .config(config)
            .build()
            .expect("test configuration is valid");
        let state = server.state().clone();
        let router = server.router_with(routes);
        Self { router, state }
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Sends a request with an optional raw `Authorization` header and JSON body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request is well-formed");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// `GET` with a bearer token.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let header = token.map(|t| format!("Bearer {}", t));
        self.send(Method::GET, path, header.as_deref(), None).await
    }

    /// `POST` a JSON body with a bearer token.
    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        let header = token.map(|t| format!("Bearer {}", t));
        self.send(Method::POST, path, header.as_deref(), Some(body)).await
    }

    /// `PUT` a JSON body with a bearer token.
    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        let header = token.map(|t| format!("Bearer {}", t));
        self.send(Method::PUT, path, header.as_deref(), Some(body)).await
    }

    /// `DELETE` with a bearer token.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let header = token.map(|t| format!("Bearer {}", t));
        self.send(Method::DELETE, path, header.as_deref(), None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
