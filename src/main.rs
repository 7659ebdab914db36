use std::net::SocketAddr;

use campaign_dashboard::config::AppConfig;
use campaign_dashboard::{routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    if config.credentials.is_default {
        tracing::warn!(
            username = %config.credentials.username,
            "DASHBOARD_USERNAME/DASHBOARD_PASSWORD not set: using built-in default credentials. \
             Set both before exposing this dashboard; APP_ENV=production refuses to start with defaults."
        );
    }

    let state = AppState::new(config)?;
    let config = state.config.clone();

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!(
        host = %addr,
        campaign_id = %config.campaign_id,
        upstream = %config.instantly_base_url,
        "Starting campaign dashboard"
    );

    let app = routes::router(state);

    axum::serve(listener, app).await?;

    Ok(())
}
