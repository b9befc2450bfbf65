//! Postgres storage

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Migrations will be run
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Connection(format!("Migrations could not run: {err}")))?;

        tracing::info!("Connected to Postgres, migrations are up to date");

        Ok(Self { connection_pool })
    }
}

/// `SQLx` version of link
#[derive(sqlx::FromRow)]
struct SqlxLink {
    /// Code
    code: String,

    /// Destination URL
    url: String,

    /// Click count, never negative
    click_count: i64,

    /// Last clicked at
    last_clicked: Option<DateTime<Utc>>,

    /// Creation date
    created_at: DateTime<Utc>,
}

impl Link {
    /// Create link from `SQLx` version
    fn from_sqlx_link(link: SqlxLink) -> Self {
        Self {
            code: link.code,
            url: link.url,
            click_count: u64::try_from(link.click_count).unwrap_or_default(),
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }

    /// Maybe create link from `SQLx` version
    fn from_sqlx_link_optional(link: Option<SqlxLink>) -> Option<Self> {
        link.map(Self::from_sqlx_link)
    }

    /// Create multiple links from `SQLx` version
    fn from_sqlx_link_multiple(links: Vec<SqlxLink>) -> Vec<Self> {
        links.into_iter().map(Self::from_sqlx_link).collect()
    }
}

impl Storage for Postgres {
    async fn find_single_link_by_code(&self, code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, SqlxLink>(
            r"
            SELECT code, url, click_count, last_clicked, created_at
            FROM links
            WHERE code = $1
            LIMIT 1
            ",
        )
        .bind(code)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_optional)
        .map_err(connection_error)?;

        Ok(link)
    }

    async fn find_all_links(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, SqlxLink>(
            r#"
            SELECT code, url, click_count, last_clicked, created_at
            FROM links
            ORDER BY created_at DESC, code COLLATE "C" ASC
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_multiple)
        .map_err(connection_error)?;

        Ok(links)
    }

    async fn create_link(&self, values: &CreateLinkValues<'_>) -> Result<Link> {
        let link = sqlx::query_as::<_, SqlxLink>(
            r"
            INSERT INTO links (code, url, created_at)
            VALUES ($1, $2, $3)
            RETURNING code, url, click_count, last_clicked, created_at
            ",
        )
        .bind(values.code)
        .bind(values.url)
        .bind(values.created_at)
        .fetch_one(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link)
        .map_err(query_error)?;

        Ok(link)
    }

    async fn increment_clicks(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, SqlxLink>(
            r"
            UPDATE links
            SET click_count = click_count + 1,
                last_clicked = GREATEST(COALESCE(last_clicked, created_at), $2)
            WHERE code = $1
            RETURNING code, url, click_count, last_clicked, created_at
            ",
        )
        .bind(code)
        .bind(clicked_at)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_optional)
        .map_err(connection_error)?;

        Ok(link)
    }

    async fn delete_link(&self, code: &str) -> Result<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM links
            WHERE code = $1
            ",
        )
        .bind(code)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

/// Convert `SQLx` error, keeping unique violations apart
fn query_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
            Error::UniqueViolation(database_error.message().to_string())
        }
        _ => connection_error(err),
    }
}
