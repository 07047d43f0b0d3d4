//! Logging bootstrap

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global logging system
///
/// `RUST_LOG` wins; otherwise `MEDIBOT_LOG_LEVEL`, otherwise `info`.
/// Calling this twice is harmless.
pub fn init_logging() {
    let level = std::env::var("MEDIBOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Length plus a short preview, so transcripts never land in logs whole
pub(crate) fn preview(text: &str) -> String {
    let head: String = text.chars().take(40).collect();
    if head.len() < text.len() {
        format!("{}... ({} chars)", head, text.chars().count())
    } else {
        head
    }
}
