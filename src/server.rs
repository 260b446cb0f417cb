//! Tracing setup and HTTP server startup.

use std::sync::{Arc, OnceLock};

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use deckflow_api::{AppState, InterfaceConfig, InterfaceServer};
use deckflow_config::{Config, LoggingConfig};
use deckflow_export::MarkdownRenderer;

use crate::bootstrap::build_engine;

/// Keeps the non-blocking file writer alive for the program duration.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Build the filter: `RUST_LOG` wins over the configured level.
pub(crate) fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr so the review loop owns stdout. File logs
/// rotate daily under `logging.log_dir` when it is set.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("deckflow")
                .filename_suffix("log")
                .max_log_files(30)
                .build(log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Serve the HTTP API until interrupted.
pub(crate) async fn run_server(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Deckflow v{}", env!("CARGO_PKG_VERSION"));

    let engine = build_engine(config).await?;
    let state = Arc::new(AppState::with_renderer(
        engine,
        Arc::new(MarkdownRenderer::new()),
        config.export.template.clone(),
    ));

    let interface_config = InterfaceConfig::new(
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port),
    );
    InterfaceServer::new(interface_config, state).run().await
}
