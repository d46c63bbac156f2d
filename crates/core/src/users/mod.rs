//! User registry - the sharing preferences that gate the leaderboard.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{NewUser, SharingPreferences, User};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};

#[cfg(test)]
mod users_service_tests;
