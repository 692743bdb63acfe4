//! Credential store adapters
//!
//! The identity service only talks to persistence through [`AccountStore`].
//! Email uniqueness is the store's responsibility; adapters report a
//! conflicting insert as [`StoreError::Duplicate`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Account;

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Credential store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// An account with the same email already exists
    #[error("Account already exists")]
    Duplicate,

    /// Backing database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Persistence operations required by the identity service
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account by identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Persist a new account and return the stored row
    async fn insert(&self, account: &Account) -> Result<Account, StoreError>;

    /// Record a successful login
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;
}
