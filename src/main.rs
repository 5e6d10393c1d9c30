#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use lynkscope::create_router;
use lynkscope::storage::Config as StorageConfig;
use lynkscope::storage::Memory;
use lynkscope::storage::Postgres;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;

use crate::utils::env_var_optional;
use crate::utils::env_var_or_else;

mod graceful_shutdown;
mod utils;

const DEFAULT_RUST_LOG: &str = "lynkscope=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let address = setup_address()?;
    let storage_config = setup_storage_config()?;

    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    match storage_config {
        StorageConfig::Memory => {
            tracing::info!("`DATABASE_URL` is not set, links are kept in memory");

            serve(listener, create_router(Memory::new())).await
        }
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let storage = Postgres::new(&database_url, max_connections).await?;

            serve(listener, create_router(storage)).await
        }
    }
}

/// Serve the app until a shutdown signal arrives
async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown::handler())
    .await?;

    Ok(())
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(env_var_or_else("RUST_LOG", || {
            DEFAULT_RUST_LOG.into()
        })))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var_optional("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}

/// Postgres when `DATABASE_URL` is set, memory otherwise
fn setup_storage_config() -> Result<StorageConfig> {
    let Some(database_url) = env_var_optional("DATABASE_URL") else {
        return Ok(StorageConfig::Memory);
    };

    let max_connections = env_var_optional("DATABASE_MAX_CONNECTIONS")
        .map(|max_connections| max_connections.parse::<u32>())
        .transpose()?
        .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);

    Ok(StorageConfig::Postgres {
        database_url,
        max_connections,
    })
}
