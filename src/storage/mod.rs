//! All things related to the storage of links

use std::future::Future;

use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use crate::links::Link;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;

/// Storage configuration
pub enum Config {
    /// Keep everything in memory, gone on shutdown
    Memory,

    /// Connect to Postgres
    Connect {
        /// The connection string
        database_url: String,

        /// Size of the connection pool
        max_connections: u32,
    },

    /// Use an existing Postgres pool
    #[allow(dead_code)] // only used by tests
    ExistingConnection(PgPool),
}

/// The storage backend picked by the configuration
pub enum Backend {
    /// In-memory storage
    Memory(Memory),

    /// Postgres storage
    Postgres(Postgres),
}

/// Setup the storage
///
/// Migrations are run for Postgres
pub async fn setup(config: Config) -> Result<Backend> {
    match config {
        Config::Memory => {
            tracing::warn!("No `DATABASE_URL` set, links are kept in memory and lost on shutdown");

            Ok(Backend::Memory(Memory::new()))
        }
        Config::Connect {
            database_url,
            max_connections,
        } => Postgres::connect(&database_url, max_connections)
            .await
            .map(Backend::Postgres),
        Config::ExistingConnection(pool) => {
            Postgres::new_with_pool(pool).await.map(Backend::Postgres)
        }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// The code is already taken by another link
    #[error("Unique violation: {0}")]
    UniqueViolation(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Link
pub struct CreateLinkValues<'a> {
    /// The code of the link
    pub code: &'a str,

    /// The URL the link redirects to, stored as provided
    pub url: &'a str,

    /// Creation date
    pub created_at: DateTime<Utc>,
}

/// Storage with all supported operations
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find a single link by its code
    fn find_single_link_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Link>>> + Send;

    /// Find all links, newest first
    fn find_all_links(&self) -> impl Future<Output = Result<Vec<Link>>> + Send;

    /// Create a link
    ///
    /// Fails with [`Error::UniqueViolation`] when the code is already taken
    fn create_link(&self, values: &CreateLinkValues<'_>)
    -> impl Future<Output = Result<Link>> + Send;

    /// Increment the click count and set the last clicked moment in a single step
    ///
    /// Returns the updated link, or `None` when there is no link with the code
    fn increment_clicks(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Link>>> + Send;

    /// Permanently delete a link
    ///
    /// Returns `false` when there was no link with the code
    fn delete_link(&self, code: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Check if the storage can be reached
    fn health_check(&self) -> impl Future<Output = Result<()>> + Send;
}
