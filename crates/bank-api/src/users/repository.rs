// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::model::{NewUser, User, UserUpdate};
use super::UserError;

/// Storage backend for user accounts.
///
/// Email lookups are case-insensitive.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Finds a user by id.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserError>;

    /// Creates a user. Fails with [`UserError::EmailTaken`] on a duplicate email.
    async fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Applies an update and returns the new state, or `None` if the user does
    /// not exist.
    async fn update(&self, user_id: Uuid, update: UserUpdate) -> Result<Option<User>, UserError>;

    /// Deletes a user. Returns `false` if the user did not exist.
    async fn delete(&self, user_id: Uuid) -> Result<bool, UserError>;

    /// Returns `true` if an account uses the email.
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError>;

    /// Name of the backend, for logs and health output.
    fn backend_name(&self) -> &'static str;
}

// =============================================================================
// InMemoryUserRepository
// =============================================================================

/// Non-durable repository backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if no users are stored.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn lookup_email(users: &HashMap<Uuid, User>, email: &str) -> Option<User> {
        users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(Self::lookup_email(&self.users.read(), email))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserError> {
        Ok(self.users.read().get(&user_id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write();
        if Self::lookup_email(&users, &new_user.email).is_some() {
            return Err(UserError::EmailTaken);
        }

        let user = User::new(new_user);
        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn update(&self, user_id: Uuid, update: UserUpdate) -> Result<Option<User>, UserError> {
        let mut users = self.users.write();
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };

        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, UserError> {
        Ok(self.users.write().remove(&user_id).is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError> {
        Ok(Self::lookup_email(&self.users.read(), email).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("ada@example.com")).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_id(user.user_id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.find_by_email("ADA@example.com").await.unwrap(),
            Some(user)
        );
        assert!(repo.exists_by_email("ada@EXAMPLE.com").await.unwrap());
        assert!(!repo.exists_by_email("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("ada@example.com")).await.unwrap();

        assert!(matches!(
            repo.create(new_user("Ada@Example.com")).await,
            Err(UserError::EmailTaken)
        ));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("ada@example.com")).await.unwrap();

        let updated = repo
            .update(
                user.user_id,
                UserUpdate {
                    last_name: Some("Byron".to_string()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "Byron");
        assert!(!updated.is_active);
        assert!(updated.updated_at >= user.updated_at);

        assert!(repo.update(Uuid::new_v4(), UserUpdate::default()).await.unwrap().is_none());

        assert!(repo.delete(user.user_id).await.unwrap());
        assert!(!repo.delete(user.user_id).await.unwrap());
        assert!(repo.is_empty());
    }
}
