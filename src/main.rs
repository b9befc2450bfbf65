#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::registry::Registry;
use crate::storage::Backend;
use crate::storage::Config as StorageConfig;
use crate::storage::Storage;
use crate::utils::env_var;
use crate::utils::env_var_or_else;
use crate::utils::parse_env_var;

mod api;
mod codes;
mod graceful_shutdown;
mod health;
mod links;
mod registry;
mod root;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "tinylink=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app(setup_storage_config()?).await?;

    let address = setup_address()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    serve(listener, app, graceful_shutdown::handler()).await
}

/// Serve the app with connect info, until the shutdown signal resolves
async fn serve<F>(listener: TcpListener, app: Router, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(signal)
    .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if the storage fails to load:
/// - Database connection
/// - Migrations
pub async fn setup_app(storage_config: StorageConfig) -> Result<Router> {
    let router = match storage::setup(storage_config).await? {
        Backend::Memory(memory) => create_router(memory),
        Backend::Postgres(postgres) => create_router(postgres),
    };

    Ok(router)
}

/// Create the router for `TinyLink`
fn create_router<S: Storage>(storage: S) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz::<S>))
        .nest("/api", router::<S>())
        .fallback(get(root::root::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Registry::new(storage)))
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

fn setup_storage_config() -> Result<StorageConfig> {
    let Some(database_url) = env_var("DATABASE_URL") else {
        return Ok(StorageConfig::Memory);
    };

    let max_connections =
        parse_env_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?;

    Ok(StorageConfig::Connect {
        database_url,
        max_connections,
    })
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}
