#![forbid(unsafe_code)]

//! Subscriber setup for the binary.
//!
//! Logs go to stderr so a scroll trace on stdout stays machine readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

use crate::cli::LogFormat;

/// Filter directives variable.
pub const LOG_ENV: &str = "VICPOWER_LOG";

pub const DEFAULT_DIRECTIVES: &str = "info";

/// Filter directives from `VICPOWER_LOG`, then `RUST_LOG`, then the default.
pub fn directives(env: impl Fn(&str) -> Option<String>) -> String {
    env(LOG_ENV)
        .or_else(|| env("RUST_LOG"))
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}

fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("ignoring invalid log filter {directives:?}: {err}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    })
}

/// Install the global subscriber.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let filter = filter(&directives(|key| std::env::var(key).ok()));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}
