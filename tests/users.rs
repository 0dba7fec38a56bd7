//! Accounts: registration, credentials, roles, status.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::UserRegister;
use breezebuy_server::db::models::user::{ROLE_CSR, ROLE_CUSTOMER, STATUS_DEACTIVATED};
use breezebuy_server::db::repository::{RepoError, UserRepository};

fn registration(username: &str) -> UserRegister {
    UserRegister {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "hunter2hunter2".to_string(),
    }
}

#[tokio::test]
async fn register_hashes_password_and_defaults_to_customer() {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());

    let user = users.create(registration("alice")).await.unwrap();
    assert_eq!(user.roles, vec![ROLE_CUSTOMER.to_string()]);
    assert!(user.is_active());
    assert_ne!(user.hash_pass, "hunter2hunter2");

    assert!(user.verify_password("hunter2hunter2").unwrap());
    assert!(!user.verify_password("wrong").unwrap());
}

#[tokio::test]
async fn duplicate_username_rejected() {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());

    users.create(registration("bob")).await.unwrap();
    let err = users.create(registration("bob")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn assign_role_is_idempotent() {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());

    let user = users.create(registration("dave")).await.unwrap();
    let id = user.id.unwrap().to_string();

    let user = users.assign_role(&id, ROLE_CSR).await.unwrap();
    assert!(user.has_role(ROLE_CSR));
    assert_eq!(user.roles.len(), 2);

    let user = users.assign_role(&id, ROLE_CSR).await.unwrap();
    assert_eq!(user.roles.len(), 2);
}

#[tokio::test]
async fn deactivated_accounts_are_flagged() {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());

    let user = users.create(registration("eve")).await.unwrap();
    let id = user.id.unwrap().to_string();

    let user = users.set_status(&id, STATUS_DEACTIVATED).await.unwrap();
    assert!(!user.is_active());
}

#[tokio::test]
async fn find_by_username_misses_cleanly() {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());
    assert!(users.find_by_username("nobody").await.unwrap().is_none());
}
