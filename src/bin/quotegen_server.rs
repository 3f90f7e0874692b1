//! quotegen-server: HTTP front end for the quote generation service.
//!
//! Configuration is read from `QUOTEGEN_*` environment variables and an
//! optional YAML file at `QUOTEGEN_CONFIG`. Log levels follow `RUST_LOG`.

use anyhow::Context;
use quotegen::client::OpenAiClient;
use quotegen::config::ServiceConfig;
use quotegen::server;
use quotegen::service::QuoteService;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quotegen=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let config = ServiceConfig::from_env().context("loading configuration")?;
    let addr = config.socket_addr()?;

    let client = OpenAiClient::new(&config.transport_config())
        .context("building provider client")?;

    tracing::info!(
        model = %config.model,
        provider = %config.provider_base_url,
        max_attempts = config.max_attempts,
        cache_enabled = config.cache_enabled,
        count_policy = ?config.count_policy,
        "starting quotegen-server {}",
        env!("CARGO_PKG_VERSION"),
    );

    let service = Arc::new(QuoteService::new(config, Arc::new(client)));
    server::serve(addr, service).await?;
    Ok(())
}
