//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    jwt::TokenCodec, password::PasswordHasher, service::IdentityService, store::AccountStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub token_codec: TokenCodec,
}

impl AppState {
    /// Wire the identity service and the session gate around one codec
    pub fn new(store: Arc<dyn AccountStore>, token_codec: TokenCodec) -> Self {
        let identity_service =
            IdentityService::new(store, PasswordHasher::new(), token_codec.clone());

        Self {
            identity_service,
            token_codec,
        }
    }
}
