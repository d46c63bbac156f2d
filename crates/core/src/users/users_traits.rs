use async_trait::async_trait;

use super::users_model::{NewUser, SharingPreferences, User};
use crate::errors::Result;

/// Trait for user registry storage
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Returns `NotFound` when the user does not exist.
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn list(&self) -> Result<Vec<User>>;
    /// Users with either sharing flag set, ordered by id.
    fn list_sharing(&self) -> Result<Vec<User>>;
    async fn upsert(&self, new_user: NewUser) -> Result<User>;
}

/// Trait for user registry operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn list_users(&self) -> Result<Vec<User>>;
    async fn upsert_user(&self, new_user: NewUser) -> Result<User>;
    /// Returns `NotFound` for unknown users.
    async fn update_sharing(
        &self,
        user_id: &str,
        preferences: SharingPreferences,
    ) -> Result<User>;
}
