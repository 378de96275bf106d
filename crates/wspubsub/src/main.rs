// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use wspubsub::config::WsPubSubConfig;

#[tokio::main]
async fn main() {
    let config = WsPubSubConfig::parse();

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&config);

    // wss:// needs a process-wide crypto provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    if let Err(e) = wspubsub::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &WsPubSubConfig) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init(),
        _ => fmt().with_env_filter(filter).with_writer(std::io::stderr).init(),
    }
}
