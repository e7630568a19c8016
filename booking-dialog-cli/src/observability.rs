//! Logging setup for the booking dialog CLI.
//!
//! Logs go to stderr so stdout only carries the dialog texts and the outcome.

use std::io;

use clap::ValueEnum;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for terminals.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Reads the format from `LOG_FORMAT` (`json` or `pretty`, default `pretty`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse_env_value(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }

    fn parse_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") { Self::Json } else { Self::Pretty }
    }
}

/// Installs the global tracing subscriber.
///
/// The level filter comes from `RUST_LOG` (default `info`). Closing `open` spans are logged so
/// the time spent loading and waiting for the user shows up.
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}
