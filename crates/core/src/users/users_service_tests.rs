use std::sync::Arc;

use super::*;
use crate::errors::{Error, ValidationError};
use crate::testing::*;

fn service() -> UserService {
    UserService::new(Arc::new(InMemoryUserRepository::default()))
}

fn new_user(id: &str, display_name: &str) -> NewUser {
    NewUser {
        id: id.to_string(),
        display_name: display_name.to_string(),
        share_daily_returns: true,
        share_full_portfolio: false,
    }
}

#[tokio::test]
async fn test_upsert_trims_and_preserves_created_at() {
    let service = service();
    let created = service
        .upsert_user(new_user(" alice ", " Alice "))
        .await
        .unwrap();
    assert_eq!(created.id, "alice");
    assert_eq!(created.display_name, "Alice");

    let updated = service
        .upsert_user(new_user("alice", "Alice B."))
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Alice B.");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(service.list_users().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upsert_validates_fields() {
    let service = service();
    assert!(matches!(
        service.upsert_user(new_user("", "Nobody")).await,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    assert!(matches!(
        service.upsert_user(new_user("alice", "  ")).await,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    let long_name = "x".repeat(65);
    assert!(matches!(
        service.upsert_user(new_user("alice", &long_name)).await,
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));
}

#[tokio::test]
async fn test_update_sharing_keeps_profile() {
    let service = service();
    service
        .upsert_user(new_user("alice", "Alice"))
        .await
        .unwrap();

    let updated = service
        .update_sharing(
            "alice",
            SharingPreferences {
                share_daily_returns: false,
                share_full_portfolio: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Alice");
    assert!(!updated.is_sharing());

    let missing = service
        .update_sharing(
            "bob",
            SharingPreferences {
                share_daily_returns: true,
                share_full_portfolio: true,
            },
        )
        .await;
    assert!(missing.unwrap_err().is_not_found());
}

#[test]
fn test_get_unknown_user_is_not_found() {
    assert!(service().get_user("ghost").unwrap_err().is_not_found());
}
