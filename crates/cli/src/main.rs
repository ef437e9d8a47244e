mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io;

use swapthreads_core::{
    config::{self, AppConfig},
    JsonStore, SwapExchange,
};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let store = JsonStore::new(&config.data_root);
    let exchange = SwapExchange::open(store)?;

    let stdin = io::stdin();
    let mut app = app::SwapApp::new(exchange, stdin.lock(), io::stdout());
    app.run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("swapthreads.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
