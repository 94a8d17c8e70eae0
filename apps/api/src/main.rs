mod agent;
mod config;
mod errors;
mod extractors;
mod fetch;
mod intake;
mod links;
mod llm_client;
mod routes;
mod search;
mod state;
mod storage;
mod structuring;
mod synthesis;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::Agent;
use crate::config::Config;
use crate::extractors::Extractors;
use crate::fetch::{ContentFetcher, FirecrawlClient};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FsProfileStore, ProfileStore};
use crate::structuring::Structurer;
use crate::synthesis::Synthesizer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dossier API v{}", env!("CARGO_PKG_VERSION"));

    let capabilities = config.capabilities();
    info!(
        "capabilities: scraping={}, vision={}",
        capabilities.scraping, capabilities.vision
    );

    // Generative-text collaborator
    let generator: Arc<dyn llm_client::TextGenerator> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Two-tier content fetcher
    let firecrawl = config.firecrawl_api_key.clone().map(FirecrawlClient::new);
    let fetcher = Arc::new(ContentFetcher::new(firecrawl));

    // Extractors + synthesis + agent
    let structurer = Structurer::new(Arc::clone(&generator));
    let extractors = Extractors::new(Arc::clone(&fetcher), structurer);
    let synthesizer = Arc::new(Synthesizer::new(Arc::clone(&generator)));
    let agent = Arc::new(Agent::new(
        Arc::clone(&generator),
        Arc::clone(&fetcher),
        capabilities,
    ));

    // Filesystem persistence gateway
    let store: Arc<dyn ProfileStore> = Arc::new(FsProfileStore::new(config.data_dir.clone()));
    info!("profile store at {}", config.data_dir);

    let state = AppState {
        config: config.clone(),
        store,
        extractors,
        synthesizer,
        agent,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
