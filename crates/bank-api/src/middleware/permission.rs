// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission enforcement middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{authorize, AuthContext, Permission, PermissionRequirement};
use crate::error::ApiError;

// =============================================================================
// PermissionLayer
// =============================================================================

/// Layer that checks a [`PermissionRequirement`] before the inner service runs.
///
/// Must sit inside an [`AuthLayer`](super::AuthLayer) so the request carries an
/// [`AuthContext`]. Requests without one are denied.
#[derive(Clone)]
pub struct PermissionLayer {
    requirement: Arc<PermissionRequirement>,
}

impl PermissionLayer {
    /// Creates a layer requiring a single permission.
    pub fn require(permission: Permission) -> Self {
        Self::new(PermissionRequirement::single(permission))
    }

    /// Creates a layer requiring all specified permissions.
    pub fn require_all(permissions: Vec<Permission>) -> Self {
        Self::new(PermissionRequirement::all(permissions))
    }

    /// Creates a layer requiring any of the specified permissions.
    pub fn require_any(permissions: Vec<Permission>) -> Self {
        Self::new(PermissionRequirement::any(permissions))
    }

    /// Creates a layer for an arbitrary requirement.
    pub fn new(requirement: PermissionRequirement) -> Self {
        Self {
            requirement: Arc::new(requirement),
        }
    }
}

impl<S> Layer<S> for PermissionLayer {
    type Service = PermissionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PermissionMiddleware {
            inner,
            requirement: self.requirement.clone(),
        }
    }
}

// =============================================================================
// PermissionMiddleware
// =============================================================================

/// Middleware for permission enforcement.
#[derive(Clone)]
pub struct PermissionMiddleware<S> {
    inner: S,
    requirement: Arc<PermissionRequirement>,
}

impl<S> Service<Request<Body>> for PermissionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let requirement = self.requirement.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let decision = authorize(req.extensions().get::<AuthContext>(), &requirement);

            match decision {
                Ok(()) => inner.call(req).await,
                Err(e) => Ok(ApiError::from(e).into_response()),
            }
        })
    }
}

/// Macro for creating permission layers.
///
/// ```ignore
/// require_permission!(Permission::BanksRead);
/// require_permission!(all: Permission::BanksRead, Permission::BanksWrite);
/// require_permission!(any: Permission::BanksRead, Permission::BanksWrite);
/// ```
#[macro_export]
macro_rules! require_permission {
    (all: $($perm:expr),+ $(,)?) => {
        $crate::middleware::PermissionLayer::require_all(vec![$($perm),+])
    };
    (any: $($perm:expr),+ $(,)?) => {
        $crate::middleware::PermissionLayer::require_any(vec![$($perm),+])
    };
    ($perm:expr) => {
        $crate::middleware::PermissionLayer::require($perm)
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Claims;

    fn mock_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
    + Send {
        tower::service_fn(|_req| async { Ok::<_, Infallible>(Response::new(Body::empty())) })
    }

    fn create_auth_context(permissions: Vec<Permission>) -> AuthContext {
        AuthContext::from_claims(Claims {
            iss: "bank-service".to_string(),
            sub: "svc-1".to_string(),
            exp: 2_000_000_000,
            service_type: "internal".to_string(),
            permissions: permissions.into_iter().collect(),
            environment: "test".to_string(),
            iat: None,
            aud: None,
        })
    }

    fn request_with(permissions: Option<Vec<Permission>>) -> Request<Body> {
        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        if let Some(permissions) = permissions {
            req.extensions_mut().insert(create_auth_context(permissions));
        }
        req
    }

    #[tokio::test]
    async fn test_permission_granted() {
        let mut service = PermissionLayer::require(Permission::BanksRead).layer(mock_service());

        let req = request_with(Some(vec![Permission::BanksRead]));
        let response = service.ready().await.unwrap().call(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let mut service = PermissionLayer::require(Permission::BanksWrite).layer(mock_service());

        let req = request_with(Some(vec![Permission::BanksRead]));
        let response = service.ready().await.unwrap().call(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_require_all() {
        let mut service = require_permission!(all: Permission::BanksRead, Permission::BanksWrite)
            .layer(mock_service());

        let req = request_with(Some(vec![Permission::BanksRead]));
        let response = service.ready().await.unwrap().call(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let req = request_with(Some(vec![Permission::BanksRead, Permission::BanksWrite]));
        let response = service.ready().await.unwrap().call(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_require_any() {
        let service = require_permission!(any: Permission::BanksRead, Permission::BanksWrite)
            .layer(mock_service());

        let req = request_with(Some(vec![Permission::BanksRead]));
        let response = service.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_auth_context_is_forbidden() {
        let service = require_permission!(Permission::BanksRead).layer(mock_service());

        let response = service.oneshot(request_with(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_empty_requirement_denies() {
        let service = PermissionLayer::require_all(vec![]).layer(mock_service());

        let req = request_with(Some(vec![Permission::BanksRead, Permission::BanksWrite]));
        let response = service.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
