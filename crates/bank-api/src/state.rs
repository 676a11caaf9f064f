// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{AuthGate, JwtCodec};
use crate::config::{ApiConfig, ConfigError};
use crate::users::{InMemoryUserRepository, UserRepository, UserService};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// The codec is built once and shared by the gate and the user service, so
/// tokens issued at login verify with exactly the same key and rules.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token codec.
    pub codec: Arc<JwtCodec>,
    /// Authorization gate.
    pub gate: Arc<AuthGate>,
    /// Account operations.
    pub users: Arc<UserService>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &JwtCodec {
        &self.codec
    }

    /// Returns the authorization gate.
    pub fn gate(&self) -> &Arc<AuthGate> {
        &self.gate
    }

    /// Returns the user service.
    pub fn users(&self) -> &UserService {
        &self.users
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .field("codec", &self.codec)
            .field("users", &self.users)
            .finish()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    codec: Option<Arc<JwtCodec>>,
    user_repository: Option<Arc<dyn UserRepository>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the codec. Built from the configuration when not set.
    pub fn codec(mut self, codec: Arc<JwtCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Sets the user repository. Defaults to an in-memory repository.
    pub fn user_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.user_repository = Some(repository);
        self
    }

    /// Builds the AppState.
    pub fn build(self) -> Result<AppState, ConfigError> {
        let config = self.config.unwrap_or_default();

        let codec = match self.codec {
            Some(codec) => codec,
            None => Arc::new(JwtCodec::new(config.jwt.clone())?),
        };

        let repository = self
            .user_repository
            .unwrap_or_else(|| Arc::new(InMemoryUserRepository::new()));

        let users = UserService::new(
            repository,
            codec.clone(),
            config.user_permissions.clone(),
            config.environment.clone(),
        );

        Ok(AppState {
            gate: Arc::new(AuthGate::new(codec.clone())),
            codec,
            users: Arc::new(users),
            config: Arc::new(config),
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<JwtCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<UserService> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ClaimsInput, JwtConfig};

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_jwt(JwtConfig::new("test-secret-key-that-is-long-enough-for-testing"))
    }

    #[test]
    fn test_app_state_builder() {
        let state = AppState::builder().config(test_config()).build().unwrap();

        assert_eq!(state.codec().issuer(), "bank-service");
        assert!(Arc::ptr_eq(state.gate().codec(), &state.codec));
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(
            AppState::builder().build(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_shared_codec() {
        let codec = Arc::new(
            JwtCodec::new(JwtConfig::new("shared-secret-that-is-long-enough-too")).unwrap(),
        );
        let state = AppState::builder()
            .config(test_config())
            .codec(codec.clone())
            .build()
            .unwrap();

        let token = codec.sign(&ClaimsInput::new("svc-1")).unwrap();
        assert!(state.gate().authenticate(Some(&format!("Bearer {token}"))).is_ok());
    }
}
