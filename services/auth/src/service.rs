//! Identity service: registration, login and current-account lookup
//!
//! Each operation is independent and terminal on failure; nothing is
//! retried. A token is only issued once the store has committed whatever the
//! operation needed to write.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::TokenCodec,
    middleware::AuthenticatedIdentity,
    models::{Account, AccountView, AuthResponse, Credentials},
    password::PasswordHasher,
    store::{AccountStore, StoreError},
    validation,
};

/// Orchestrates the password hasher, credential store and token codec
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
}

impl IdentityService {
    /// Create a new identity service
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher, tokens: TokenCodec) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Create an account and sign the caller in
    pub async fn register(&self, credentials: Credentials) -> AuthResult<AuthResponse> {
        validation::validate_registration(&credentials)?;

        let Credentials { email, password } = credentials;
        let password_hash = self.hash_password(password).await?;
        let account = Account::new(email, password_hash);

        let stored = self.store.insert(&account).await.map_err(|e| match e {
            StoreError::Duplicate => AuthError::AccountExists,
            other => AuthError::Store(other),
        })?;

        info!("Registered account: {}", stored.id);

        let token = self.tokens.issue(stored.id, Utc::now())?;
        Ok(AuthResponse {
            token,
            user: stored.view(),
        })
    }

    /// Verify credentials and sign the caller in
    pub async fn login(&self, credentials: Credentials) -> AuthResult<AuthResponse> {
        validation::validate_login(&credentials)?;

        let Credentials { email, password } = credentials;
        let Some(account) = self.store.find_by_email(&email).await? else {
            // Same hashing work as a wrong password for a known account
            if let Err(e) = self.verify_dummy(password).await {
                warn!("Dummy password verification failed: {}", e);
            }
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_password(password, account.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        if let Err(e) = self.store.record_login(account.id, now).await {
            warn!("Failed to record last login for account {}: {}", account.id, e);
        }

        info!("Account signed in: {}", account.id);

        let token = self.tokens.issue(account.id, now)?;
        Ok(AuthResponse {
            token,
            user: account.view(),
        })
    }

    /// Fetch the account behind an authenticated request
    pub async fn current(&self, identity: AuthenticatedIdentity) -> AuthResult<AccountView> {
        let account = self
            .store
            .find_by_id(identity.account_id())
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(account.view())
    }

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_dummy(&self, password: String) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("Verification task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, stored: String) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AuthError::Hashing(format!("Verification task failed: {}", e)))?
    }
}
