//! Server configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Origin of the dashboard frontend's dev server
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Load variables from the `.env` file in the working directory or its parents.
///
/// Variables already set in the process environment win. Returns `Ok(false)`
/// when no file exists.
pub fn load_dotenv() -> Result<bool, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Load variables from a specific env file, with the semantics of [`load_dotenv`]
pub fn load_dotenv_from(path: impl AsRef<Path>) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Which credential store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`
    Postgres,
    /// Process memory; accounts vanish on restart
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Credential store backend
    pub account_store: StoreBackend,
}

impl ServerConfig {
    /// Load the server configuration from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Bind interface (default: "0.0.0.0")
    /// - `PORT`: Listen port (default: 8080)
    /// - `ACCOUNT_STORE`: `postgres` or `memory` (default: "postgres")
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("account_store", "postgres")?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Cross-origin access for browser clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API with credentials
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl CorsConfig {
    /// Load the CORS configuration from environment variables
    ///
    /// # Environment Variables
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: "http://localhost:5173").
    ///   An empty value disables cross-origin access.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("cors_allowed_origins", DEFAULT_CORS_ORIGIN)?
            .add_source(config::Environment::default())
            .build()?;

        let origins: String = settings.get("cors_allowed_origins")?;
        Self::from_list(&origins)
    }

    /// Parse a comma-separated origin list
    pub fn from_list(origins: &str) -> Result<Self> {
        let allowed_origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if allowed_origins.iter().any(|origin| origin == "*") {
            anyhow::bail!("CORS_ALLOWED_ORIGINS cannot contain '*' because credentials are allowed");
        }

        Ok(Self { allowed_origins })
    }
}
