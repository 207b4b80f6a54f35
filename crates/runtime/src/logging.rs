//! Tracing subscriber bootstrap.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to INFO.
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(directives.as_deref());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(target: "duel::engine", "logging initialized");
    Ok(())
}

/// Parses `directives` as-is; unset or malformed input falls back to INFO.
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::Layer;
    use tracing_subscriber::registry::Registry;

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn rust_log_level_is_honored() {
        assert_eq!(max_level(&build_filter(Some("debug"))), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(&build_filter(Some("warn"))), Some(LevelFilter::WARN));
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(max_level(&build_filter(None)), Some(LevelFilter::INFO));
        assert_eq!(max_level(&build_filter(Some("  "))), Some(LevelFilter::INFO));
    }
}
