//! Checkmate server entry point.

use std::sync::Arc;

use http::{header, HeaderValue, Method};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use checkmate::adapters::ai::{OpenAIConfig, OpenAIProvider};
use checkmate::adapters::http::{chat_routes, ChatHandlers};
use checkmate::application::handlers::{PlayTurnHandler, PlayTurnSettings, ResetGameHandler};
use checkmate::config::{AppConfig, CorsPolicy, LogFormat, ServerConfig};
use checkmate::ports::AIProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let provider = build_provider(&config)?;

    let rng = match config.game.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let settings = PlayTurnSettings {
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
        dev_mode: config.server.exposes_debug_hints(),
    };

    let handlers = ChatHandlers::new(
        Arc::new(PlayTurnHandler::new(provider, settings, rng)),
        Arc::new(ResetGameHandler::new(config.game.reset_delay())),
    );

    let app = chat_routes(handlers)
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %config.server.environment, "Checkmate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Builds the completion provider, or `None` when no key is configured.
fn build_provider(
    config: &AppConfig,
) -> Result<Option<Arc<dyn AIProvider>>, Box<dyn std::error::Error>> {
    for warning in config.ai.key_warnings() {
        tracing::warn!("{}", warning);
    }

    let Some(provider_config) = OpenAIConfig::from_app_config(&config.ai) else {
        tracing::warn!("No API key configured; chat turns will report missing configuration");
        return Ok(None);
    };

    tracing::info!(
        key = config.ai.masked_key().as_deref().unwrap_or(""),
        model = %config.ai.model,
        base_url = %config.ai.base_url,
        "Completion provider configured"
    );

    let provider: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(provider_config)?);
    Ok(Some(provider))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = match server.cors_policy() {
        CorsPolicy::AnyOrigin => return CorsLayer::permissive(),
        CorsPolicy::Origins(origins) => origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect(),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
