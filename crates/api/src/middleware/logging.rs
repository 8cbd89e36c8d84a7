//! Logging initialization.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// A `RUST_LOG` environment variable overrides the configured level.
/// `json` output is the production default; any other format value falls
/// back to pretty output for local runs.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().pretty().with_span_events(FmtSpan::CLOSE))
            .init();
    }
}

/// Per-user sweeps and summary builds run many queries; keep sqlx
/// statement logging quiet unless asked for explicitly.
fn default_directives(level: &str) -> String {
    format!("{level},sqlx::query=warn")
}
