// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account use cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{ClaimsInput, JwtCodec, PermissionSet};

use super::model::{
    LoginRequest, LoginResponse, LoginUser, NewUser, RegisterRequest, UpdateProfileRequest,
    UserProfile, UserUpdate,
};
use super::password::{hash_password_blocking, verify_dummy, verify_password_blocking};
use super::repository::UserRepository;
use super::validator::{validate_profile_update, validate_registration};
use super::UserError;

/// Service type written into user tokens.
pub const USER_SERVICE_TYPE: &str = "user";

/// Registration, login and profile operations.
///
/// Login tokens are signed by the same codec the gate verifies with, so a user
/// token passes through exactly the same checks as a service token.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    codec: Arc<JwtCodec>,
    permissions: PermissionSet,
    environment: String,
}

impl UserService {
    /// Creates a service.
    ///
    /// `permissions` and `environment` are written into every login token.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        codec: Arc<JwtCodec>,
        permissions: PermissionSet,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            codec,
            permissions,
            environment: environment.into(),
        }
    }

    /// Returns the backing repository.
    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repository
    }

    /// Creates an account.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile, UserError> {
        validate_registration(&request).map_err(UserError::Validation)?;

        if self.repository.exists_by_email(&request.email).await? {
            return Err(UserError::EmailTaken);
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = self
            .repository
            .create(NewUser {
                email: request.email,
                password_hash,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
            })
            .await?;

        tracing::info!(user_id = %user.user_id, "User registered");
        Ok(user.profile())
    }

    /// Checks credentials and issues a token.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, UserError> {
        let Some(user) = self.repository.find_by_email(&request.email).await? else {
            verify_dummy(request.password).await?;
            tracing::debug!("Login for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !user.is_active {
            tracing::info!(user_id = %user.user_id, "Login for deactivated account");
            return Err(UserError::AccountDeactivated);
        }

        if !verify_password_blocking(request.password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.user_id, "Login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let input = ClaimsInput::new(user.user_id.to_string())
            .service_type(USER_SERVICE_TYPE)
            .permissions(self.permissions.iter().copied())
            .environment(self.environment.clone());
        let token = self.codec.sign(&input)?;

        tracing::info!(user_id = %user.user_id, "User logged in");
        Ok(LoginResponse {
            token,
            user: LoginUser::from(&user),
        })
    }

    /// Returns the profile for a token subject.
    pub async fn get_profile(&self, subject: &str) -> Result<UserProfile, UserError> {
        let user_id = parse_subject(subject)?;

        self.repository
            .find_by_id(user_id)
            .await?
            .map(|u| u.profile())
            .ok_or(UserError::NotFound)
    }

    /// Updates first and/or last name for a token subject.
    pub async fn update_profile(
        &self,
        subject: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, UserError> {
        let user_id = parse_subject(subject)?;

        if self.repository.find_by_id(user_id).await?.is_none() {
            return Err(UserError::NotFound);
        }

        validate_profile_update(&request).map_err(UserError::Validation)?;

        let update = UserUpdate {
            first_name: request.first_name.map(|n| n.trim().to_string()),
            last_name: request.last_name.map(|n| n.trim().to_string()),
            is_active: None,
        };
        if update.is_empty() {
            return Err(UserError::NoUpdates);
        }

        let user = self
            .repository
            .update(user_id, update)
            .await?
            .ok_or(UserError::NotFound)?;

        tracing::info!(user_id = %user.user_id, "User profile updated");
        Ok(user.profile())
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("backend", &self.repository.backend_name())
            .field("permissions", &self.permissions.to_names())
            .field("environment", &self.environment)
            .finish()
    }
}

/// Service tokens have non-UUID subjects; they have no profile.
fn parse_subject(subject: &str) -> Result<Uuid, UserError> {
    Uuid::parse_str(subject).map_err(|_| UserError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, Permission};
    use crate::users::InMemoryUserRepository;

    fn service() -> (UserService, Arc<JwtCodec>, Arc<InMemoryUserRepository>) {
        let codec = Arc::new(
            JwtCodec::new(JwtConfig::new("user-service-test-secret-long-enough")).unwrap(),
        );
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(
            repo.clone(),
            codec.clone(),
            PermissionSet::from([Permission::BanksRead]),
            "test",
        );
        (service, codec, repo)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "Secret123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            email: "ada@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let (service, _, repo) = service();
        let profile = service.register(register_request()).await.unwrap();

        assert_eq!(profile.email, "ada@example.com");
        assert!(profile.is_active);

        let stored = repo.find_by_id(profile.user_id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Secret123");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_and_invalid() {
        let (service, _, _) = service();
        service.register(register_request()).await.unwrap();

        assert!(matches!(
            service.register(register_request()).await,
            Err(UserError::EmailTaken)
        ));

        let mut bad = register_request();
        bad.email = "nope".to_string();
        bad.password = "weak".to_string();
        match service.register(bad).await {
            Err(UserError::Validation(errors)) => assert!(errors.len() >= 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let (service, codec, _) = service();
        let profile = service.register(register_request()).await.unwrap();

        let response = service.login(login_request("Secret123")).await.unwrap();
        assert_eq!(response.user.user_id, profile.user_id);

        let claims = codec.verify(&response.token).unwrap();
        assert_eq!(claims.sub, profile.user_id.to_string());
        assert_eq!(claims.service_type, USER_SERVICE_TYPE);
        assert_eq!(claims.environment, "test");
        assert!(claims.has_permission(Permission::BanksRead));
        assert!(!claims.has_permission(Permission::BanksWrite));
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (service, _, repo) = service();
        let profile = service.register(register_request()).await.unwrap();

        let err = service.login(login_request("Wrong1234")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        let mut unknown = login_request("Secret123");
        unknown.email = "bob@example.com".to_string();
        let err = service.login(unknown).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        repo.update(
            profile.user_id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let err = service.login(login_request("Secret123")).await.unwrap_err();
        assert_eq!(err.to_string(), "Account is deactivated");
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let (service, _, _) = service();
        let profile = service.register(register_request()).await.unwrap();
        let subject = profile.user_id.to_string();

        assert_eq!(service.get_profile(&subject).await.unwrap(), profile);

        let updated = service
            .update_profile(
                &subject,
                UpdateProfileRequest {
                    first_name: Some("  Augusta ".to_string()),
                    last_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.last_name, "Lovelace");

        assert!(matches!(
            service
                .update_profile(&subject, UpdateProfileRequest::default())
                .await,
            Err(UserError::NoUpdates)
        ));
    }

    #[tokio::test]
    async fn test_profile_for_unknown_subject() {
        let (service, _, _) = service();

        assert!(matches!(
            service.get_profile("svc-1").await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(
            service.get_profile(&Uuid::new_v4().to_string()).await,
            Err(UserError::NotFound)
        ));
    }
}
