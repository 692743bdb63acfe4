//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    config::CorsConfig,
    error::AuthError,
    middleware::{AuthenticatedIdentity, auth_middleware},
    models::Credentials,
    state::AppState,
};

/// Build the CORS policy for browser clients of the API
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true))
}

/// Create the router for the service.
///
/// `protected` holds the routes of collaborating handlers; they are nested
/// under `/api` together with `/api/auth/me` and only run for requests that
/// carry a valid session token. `cors` wraps everything, so preflight
/// requests are answered before the session gate sees them.
pub fn create_router(state: AppState, protected: Router<AppState>, cors: CorsLayer) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected_routes);

    Router::new().nest("/api", api).layer(cors).with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Account registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(credentials) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let response = state.identity_service.register(credentials).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(credentials) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let response = state.identity_service.login(credentials).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Current account endpoint
pub async fn me(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
) -> Result<impl IntoResponse, AuthError> {
    let account = state.identity_service.current(identity).await?;

    Ok(Json(account))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_unusable_origin() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());

        let config = CorsConfig {
            allowed_origins: vec!["http://bad\norigin".to_string()],
        };
        assert!(cors_layer(&config).is_err());
    }
}
