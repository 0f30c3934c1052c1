//! Log output - one `tracing` subscriber for the whole process.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Directives used when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVES: &str = "info,posts_api=debug,posts_infra=debug";

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line, carrying the request root span fields.
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; everything else is pretty output.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global subscriber and log the settings the server runs with.
pub fn init_telemetry(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }

    tracing::info!(
        service = %config.service_name,
        log_format = ?config.log_format,
        concurrency = ?config.concurrency,
        default_page_size = config.default_page_size,
        "Telemetry initialized"
    );
}
