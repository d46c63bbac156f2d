//! SQLite storage implementation for the user registry.

mod model;
mod repository;

pub use model::UserDB;
pub use repository::UserRepository;

// Re-export trait from core for convenience
pub use tradeboard_core::users::UserRepositoryTrait;
