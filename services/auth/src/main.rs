use anyhow::Result;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{
    AppState,
    config::{self, CorsConfig, ServerConfig, StoreBackend},
    jwt::{TokenCodec, TokenConfig},
    routes,
    store::{AccountStore, MemoryAccountStore, PgAccountStore},
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    // Before logging so RUST_LOG can come from the file too
    let dotenv = config::load_dotenv();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    match dotenv {
        Ok(true) => info!("Loaded environment from .env"),
        Ok(false) => warn!(".env file not found, using environment variables"),
        Err(e) => warn!("Failed to load .env file, using environment variables: {}", e),
    }

    let server_config = ServerConfig::from_env()?;
    let store = init_store(server_config.account_store).await?;

    let token_codec = TokenCodec::new(&TokenConfig::from_env());
    let app_state = AppState::new(store, token_codec);

    let cors = routes::cors_layer(&CorsConfig::from_env()?)?;
    // Entity CRUD handlers are mounted here by their own crates.
    let app = routes::create_router(app_state, axum::Router::new(), cors);

    let listener = TcpListener::bind(server_config.bind_address()).await?;
    info!(
        "Authentication service listening on {}",
        server_config.bind_address()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Authentication service stopped");
    Ok(())
}

async fn init_store(backend: StoreBackend) -> Result<Arc<dyn AccountStore>> {
    match backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;
            Ok(Arc::new(PgAccountStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory account store; accounts are lost on restart");
            Ok(Arc::new(MemoryAccountStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
