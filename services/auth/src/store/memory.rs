//! In-process account store for tests and local runs without PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::Account;

/// Account store kept in memory; contents are lost on restart
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an account, returning whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        self.accounts.write().await.remove(&id).is_some()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether the store holds no accounts
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<Account, StoreError> {
        // Uniqueness check and insert happen under one write lock.
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) || accounts.values().any(|a| a.email == account.email)
        {
            return Err(StoreError::Duplicate);
        }

        let mut stored = account.clone();
        stored.created_at = Utc::now();
        accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(account) = self.accounts.write().await.get_mut(&id) {
            account.last_login = Some(at);
        }
        Ok(())
    }
}
