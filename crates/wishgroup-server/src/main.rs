//! Wishgroup Server — application entry point.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wishgroup_auth::AuthConfig;
use wishgroup_db::{DbConfig, DbManager};
use wishgroup_server::provider::{DisabledIdentityProvider, HttpIdentityProvider};
use wishgroup_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("wishgroup=info".parse().unwrap()),
        )
        .json()
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting wishgroup server...");

    let auth = AuthConfig::from_env()?;

    let db_config = DbConfig::from_env();
    let manager = DbManager::connect(&db_config).await?;
    let db = manager.client().clone();

    wishgroup_db::run_migrations(&db).await?;
    wishgroup_db::seed_roles(&db).await?;

    let provider: Arc<dyn wishgroup_auth::ExternalIdentityProvider> =
        match HttpIdentityProvider::from_env() {
            Some(http) => Arc::new(http),
            None => {
                info!("No identity endpoint configured; federated login disabled");
                Arc::new(DisabledIdentityProvider)
            }
        };

    let state = AppState::new(db, auth, provider);
    let router = wishgroup_server::create_router(state);

    let bind = std::env::var("WISHGROUP_BIND").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "Listening");

    axum::serve(listener, router).await?;

    info!("wishgroup server stopped.");
    Ok(())
}
