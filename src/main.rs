use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod grid;
mod notify;
mod routes;
mod utils;
mod weather;

use config::Config;
use notify::{Language, LogNotifier};
use routes::{create_router, AppState};
use weather::fetcher::WindFetcher;
use weather::kma::KmaClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wind_nowcast_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let timezone = utils::parse_timezone(&config.app_timezone).map_err(|e| anyhow::anyhow!(e))?;
    let language = Language::from_tag(&config.app_language);

    // Initialize KMA client and the per-site observation cache
    let client = KmaClient::new(config);
    let fetcher = Arc::new(WindFetcher::new(
        client,
        weather::init_cache(),
        Arc::new(LogNotifier),
        language,
        timezone,
    ));

    let state = AppState { fetcher };

    let app = create_router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Server starting on http://0.0.0.0:8080");

    axum::serve(listener, app).await?;

    Ok(())
}
