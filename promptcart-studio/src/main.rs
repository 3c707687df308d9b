//! promptcart-studio - tag picker and prompt composer
//!
//! Serves the studio HTTP API: taxonomy browsing, tag selection, prompt
//! editing, translation and AI optimization.

use anyhow::{Context, Result};
use clap::Parser;
use promptcart_common::config::TomlConfig;
use promptcart_common::events::EventBus;
use promptcart_studio::enrichment::EnrichmentOrchestrator;
use promptcart_studio::preferences::{MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore};
use promptcart_studio::services::{GeminiClient, MyMemoryClient};
use promptcart_studio::session::Session;
use promptcart_studio::taxonomy::Taxonomy;
use promptcart_studio::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "promptcart-studio")]
#[command(about = "Compose image-generation prompts from a tag catalogue")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "PROMPTCART_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Taxonomy JSON file (overrides config)
    #[arg(short, long)]
    taxonomy: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(taxonomy) = args.taxonomy {
        config.taxonomy_path = Some(taxonomy);
    }

    // RUST_LOG takes precedence over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting PromptCart Studio (promptcart-studio) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let taxonomy = match &config.taxonomy_path {
        Some(path) => Taxonomy::load(path)?,
        None => {
            let taxonomy = Taxonomy::sample()?;
            info!(tags = taxonomy.tag_count(), "No taxonomy configured; using bundled sample");
            taxonomy
        }
    };

    let store: Arc<dyn PreferenceStore> = if args.ephemeral {
        info!("Preferences kept in memory (--ephemeral)");
        Arc::new(MemoryPreferenceStore::new())
    } else {
        let db_path = config.database_path();
        info!("Database path: {}", db_path.display());
        Arc::new(SqlitePreferenceStore::open(&db_path).await?)
    };

    let event_bus = EventBus::new(config.event_capacity);
    let session = Session::load(store, event_bus.clone()).await?.into_shared();

    let translator = MyMemoryClient::new(
        &config.translation.base_url,
        Duration::from_secs(config.translation.timeout_secs),
    )
    .context("Failed to build translation client")?;
    let optimizer = GeminiClient::new(
        config.optimizer.model.clone(),
        Duration::from_secs(config.optimizer.timeout_secs),
    )
    .context("Failed to build optimizer client")?;
    info!(model = optimizer.model(), "Optimizer model configured");

    let orchestrator = Arc::new(EnrichmentOrchestrator::new(
        Arc::new(translator),
        Arc::new(optimizer),
        event_bus.clone(),
    ));

    let state = AppState::new(session, orchestrator, Arc::new(taxonomy), event_bus);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("promptcart-studio listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
