//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example logging_demo
//! cargo run -p core-runtime --example logging_demo -- json
//! cargo run -p core-runtime --example logging_demo -- compact "core_playback=trace"
//! ```

use bridge_traits::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, redact_url, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[core_async::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = args
        .get(1)
        .and_then(|name| name.parse::<LogFormat>().ok())
        .unwrap_or_default();

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Debug)
        .with_span_events(true)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    init_logging(config).expect("Failed to initialize logging");
    info!(format = ?format, "Logging initialized");

    load("https://cdn.example.com/tracks/intro.mp3?token=s3cr3t").await;
    seek(512.0, 245.0).await;

    // Give the sink task a moment to print.
    core_async::sleep(core_async::Duration::from_millis(20)).await;
}

#[instrument(skip_all, fields(url = %redact_url(url)))]
async fn load(url: &str) {
    debug!("Loading content");
    core_async::sleep(core_async::Duration::from_millis(5)).await;
    info!(total_duration_secs = 245.0, "Track ready");
}

#[instrument]
async fn seek(position: f64, total: f64) {
    if position > total {
        warn!(clamped_to = total, "Seek position past the end");
    }
}
