use std::sync::Arc;

use core_lib::config::AppConfig;
use github::GitHubProvider;
use server::routes::{self, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // All four values are required; a missing one aborts startup here.
    let config = AppConfig::from_env()?;

    let github = GitHubProvider::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_url.clone(),
    );

    let state = Arc::new(AppState { config, github });
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
