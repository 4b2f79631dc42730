// Tracing subscriber setup
use crate::infrastructure::config::LogSettings;
use anyhow::Context;
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Console output at info (debug when verbose), overridable with `RUST_LOG`.
/// When `log.file` is set, a second plain-text layer writes there at `log.level`.
pub fn init_logging(verbose: bool, settings: &LogSettings) -> anyhow::Result<()> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level(verbose).into())
        .from_env_lossy();
    let console = fmt::layer().with_filter(console_filter);

    let file = match &settings.file {
        Some(path) => {
            let level = LevelFilter::from_str(&settings.level)
                .with_context(|| format!("Invalid log level {}", settings.level))?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(level),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
