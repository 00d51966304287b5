//! # Backend Service
//!
//! Thin entry point that delegates to [`backend::start_server`].

use backend::{server::init_tracing, start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    start_server(config).await
}
