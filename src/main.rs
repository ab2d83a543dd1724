use clap::Parser;
use proteus::adapters::api_handler::ApiState;
use proteus::adapters::generator::FakeGenerator;
use proteus::adapters::health_handler::HealthHandler;
use proteus::adapters::proxy::UpstreamForwarder;
use proteus::cli::Cli;
use proteus::config::Settings;
use proteus::domain::EngineError;
use proteus::engine::extractor::InterfaceExtractor;
use proteus::engine::watcher::SourceWatcher;
use proteus::engine::MockEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Proteus mock API server on {}:{}", host, port);

    let directories = settings.directories();
    prepare_directories(&directories)?;

    let engine = Arc::new(MockEngine::new(
        directories,
        Arc::new(InterfaceExtractor::new()),
        settings.cache.enabled,
    ));

    // Keep watching for the lifetime of the process.
    let _watcher = SourceWatcher::spawn(engine.clone())?;

    let state = ApiState {
        engine: engine.clone(),
        generator: Arc::new(FakeGenerator),
        forwarder: settings
            .upstream
            .as_ref()
            .map(|upstream| Arc::new(UpstreamForwarder::new(upstream.url.clone()))),
        latency: settings.latency,
    };
    if let Some(forwarder) = &state.forwarder {
        info!("Forwarding unresolved routes to {}", forwarder.base_url());
    }

    let health_handler = Arc::new(HealthHandler::new(engine));
    let app = proteus::create_app(state, health_handler);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The primary directory (index 0) is auto-created so a fresh project starts
/// with an empty, valid source. Any additional directory that is missing is a
/// configuration mistake the operator has to fix, so startup fails fast.
fn prepare_directories(directories: &[std::path::PathBuf]) -> anyhow::Result<()> {
    if let Some(primary) = directories.first() {
        if !primary.exists() {
            std::fs::create_dir_all(primary)?;
            info!("Created primary source directory {}", primary.display());
        }
    }
    for dir in directories.iter().skip(1) {
        if !dir.is_dir() {
            return Err(EngineError::DirectoryUnavailable(dir.clone()).into());
        }
    }
    Ok(())
}
