//! PostgreSQL account store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseError;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::Account;

/// Account store backed by the `users` table
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, employee_id, email, password_hash, created_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        debug!("Finding account by ID: {}", id);

        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, employee_id, email, password_hash, created_at, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(account)
    }

    async fn insert(&self, account: &Account) -> Result<Account, StoreError> {
        info!("Creating account: {}", account.id);

        let stored = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (id, employee_id, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, employee_id, email, password_hash, created_at, last_login
            "#,
        )
        .bind(account.id)
        .bind(account.employee_id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from_query(e) {
            err if err.is_unique_violation() => StoreError::Duplicate,
            err => StoreError::Database(err),
        })?;

        Ok(stored)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users SET last_login = $1 WHERE id = $2
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }
}
