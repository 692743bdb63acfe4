//! Account model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Account entity as stored.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// service. Use [`AccountView`] for anything sent to a caller.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Build a not-yet-persisted account with a fresh identifier
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: None,
            email,
            password_hash,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// Public projection of this account
    pub fn view(&self) -> AccountView {
        AccountView::from(self)
    }
}

/// Public account representation returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            employee_id: account.employee_id,
            email: account.email.clone(),
            created_at: account.created_at,
            last_login: account.last_login,
        }
    }
}

/// Registration or login input
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response for successful registration and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountView,
}
