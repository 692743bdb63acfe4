//! Integration tests for the PostgreSQL account store
//!
//! These run against the database named by `DATABASE_URL` and exercise the
//! mapping from the `users_email_key` constraint to `StoreError::Duplicate`.

use auth::{
    models::Account,
    store::{AccountStore, PgAccountStore, StoreError},
};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use uuid::Uuid;

async fn store() -> Result<PgAccountStore, Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;
    Ok(PgAccountStore::new(pool))
}

/// A second insert with the same email is a duplicate and leaves the first row alone
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_duplicate_email_insert_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let email = format!("dup-{}@example.com", Uuid::new_v4());

    let first = Account::new(email.clone(), "$argon2id$first".to_string());
    let stored = store.insert(&first).await?;
    assert_eq!(stored.id, first.id);

    let second = Account::new(email.clone(), "$argon2id$second".to_string());
    let err = store.insert(&second).await.unwrap_err();
    assert!(
        matches!(err, StoreError::Duplicate),
        "expected a duplicate, got {:?}",
        err
    );

    let found = store.find_by_email(&email).await?.expect("first row is gone");
    assert_eq!(found.id, first.id);
    assert_eq!(found.password_hash, "$argon2id$first");
    assert!(store.find_by_id(second.id).await?.is_none());

    Ok(())
}

/// Lookups and last-login updates round through the real schema
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_record_login_updates_row() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let account = Account::new(
        format!("login-{}@example.com", Uuid::new_v4()),
        "$argon2id$hash".to_string(),
    );
    store.insert(&account).await?;

    let before = store.find_by_id(account.id).await?.expect("row was inserted");
    assert!(before.last_login.is_none());

    let at = chrono::Utc::now();
    store.record_login(account.id, at).await?;

    let after = store.find_by_id(account.id).await?.expect("row was inserted");
    let recorded = after.last_login.expect("last_login was set");
    assert!((recorded - at).num_milliseconds().abs() < 1);

    Ok(())
}
