use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::users_model::{NewUser, SharingPreferences, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result, ValidationError};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list()
    }

    async fn upsert_user(&self, mut new_user: NewUser) -> Result<User> {
        new_user.id = new_user.id.trim().to_string();
        new_user.display_name = new_user.display_name.trim().to_string();

        if new_user.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        if new_user.display_name.is_empty() {
            return Err(ValidationError::MissingField("displayName".to_string()).into());
        }
        if new_user.display_name.chars().count() > 64 {
            return Err(Error::invalid_input(
                "displayName must be at most 64 characters",
            ));
        }

        debug!(
            "Upserting user {} (daily returns: {}, full portfolio: {})",
            new_user.id, new_user.share_daily_returns, new_user.share_full_portfolio
        );
        self.repository.upsert(new_user).await
    }

    async fn update_sharing(
        &self,
        user_id: &str,
        preferences: SharingPreferences,
    ) -> Result<User> {
        let existing = self.repository.get_by_id(user_id)?;
        debug!("Updating sharing preferences for {}: {:?}", user_id, preferences);
        self.repository
            .upsert(NewUser {
                id: existing.id,
                display_name: existing.display_name,
                share_daily_returns: preferences.share_daily_returns,
                share_full_portfolio: preferences.share_full_portfolio,
            })
            .await
    }
}
