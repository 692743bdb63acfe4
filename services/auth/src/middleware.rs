//! Middleware for session token validation and authentication
//!
//! Every protected route is mounted behind [`auth_middleware`]. The gate
//! only checks signature and expiry; it never touches the credential store,
//! so a token stays usable until it expires even if its account is deleted.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::TokenCodec,
    state::AppState,
};

/// Account identifier proven by the current request's session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity(pub Uuid);

impl AuthenticatedIdentity {
    /// The authenticated account's identifier
    pub fn account_id(&self) -> Uuid {
        self.0
    }
}

/// Resolve the caller's identity from the `Authorization: Bearer` header
pub fn authenticate(
    headers: &HeaderMap,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> AuthResult<AuthenticatedIdentity> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthError::Unauthenticated)?;

    let token = bearer.token().trim();
    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    let account_id = codec.verify(token, now).map_err(|e| {
        debug!("Rejected session token: {}", e);
        AuthError::Unauthenticated
    })?;

    Ok(AuthenticatedIdentity(account_id))
}

/// Reject unauthenticated requests and attach the identity to the rest
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = authenticate(req.headers(), &state.token_codec, Utc::now())?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route sits behind `auth_middleware`.
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}
