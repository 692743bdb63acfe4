//! Credential and session service for the management dashboard
//!
//! Accounts register and log in with an email and password, receive a
//! signed session token, and present it as a bearer credential on every
//! protected route. The modules map onto the pieces of that flow:
//!
//! - [`password`]: salted one-way password hashing
//! - [`jwt`]: session token issuance and verification
//! - [`store`]: credential persistence behind the [`store::AccountStore`] trait
//! - [`middleware`]: the request-time session gate
//! - [`service`]: registration, login and current-account orchestration
//! - [`routes`]: the HTTP surface

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use middleware::AuthenticatedIdentity;
pub use state::AppState;
