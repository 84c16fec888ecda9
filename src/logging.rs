// Centralized logging setup for tracing with runtime log level and optional JSON file output
use std::env;
use std::fs;
use std::sync::OnceLock; // For global file guard
use eyre::{Result, eyre};
use tracing_subscriber::{
    fmt,
    EnvFilter,
    layer::{SubscriberExt, Layer},
    util::SubscriberInitExt
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("warn,xueqiu_fetcher={}", level))
        .unwrap_or_else(|_| EnvFilter::new("xueqiu_fetcher=info"))
}

pub fn init_logging(bin_name: String) -> Result<()> {
    // Load log levels for console and file from env
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    // Console goes to stderr so JSON written to stdout stays clean
    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(crate_filter(&console_log_level));

    if log_to_file {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let log_file_name = format!("{}_{}.log", bin_name, timestamp);

        let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        // File layer: structured JSON logs with UTC timestamps
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(crate_filter(&file_log_level));

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
    }

    Ok(())
}
