use std::sync::Arc;

use anyhow::Context;
use rickmorty_core::RickMortyClient;
use rickmorty_demo::{driver, Config, UreqTransport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries only the output line; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let client = RickMortyClient::new(&config.base_url);
    let transport = Arc::new(UreqTransport::new(config.timeout));

    let report = driver::run(&client, transport).await;
    println!("{}", report.output_line());
    Ok(())
}
