//! Process-wide tracing setup.
//!
//! Log lines go to stderr with an uptime timestamp. stdout is left to
//! `--help` / `--version` text. Pipeline stages run inside spans, and their
//! timings are printed when they close once the filter admits `debug`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Filter used when `RUST_LOG` is unset or cannot be parsed.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// Filtering follows `RUST_LOG` (for example `RUST_LOG=debug` or
/// `RUST_LOG=jls_convert=trace`) and falls back to [`DEFAULT_FILTER`].
/// Calling it again, or after another subscriber was installed, leaves the
/// existing subscriber in place.
///
/// # Examples
///
/// ```no_run
/// jls_convert::logger::init();
/// tracing::info!("converter ready");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let span_events = span_events_for(env_filter.max_level_hint());

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

/// Span close events (with busy/idle timings) once `debug` is enabled.
fn span_events_for(max_level: Option<LevelFilter>) -> FmtSpan {
    match max_level {
        Some(level) if level >= LevelFilter::DEBUG => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    }
}
