//! The link registry
//!
//! Owns the rules around links: validation, code allocation and resolving a code into a redirect
//! while counting the click. All state lives in the storage, the registry holds none of its own.

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use url::Url;

use crate::codes;
use crate::links::Link;
use crate::storage;
use crate::storage::CreateLinkValues;
use crate::storage::Storage;

/// Registry errors
#[derive(Debug, Error)]
pub enum Error {
    /// The URL is missing or not an absolute URL with a host
    #[error("Invalid URL")]
    InvalidUrl,

    /// The explicit code does not match the code format
    #[error("Code must match [A-Za-z0-9]{{6,8}}")]
    InvalidCode,

    /// The code is already taken
    #[error("Code already exists")]
    CodeConflict,

    /// No free code found after the maximum number of attempts
    #[error("Failed to generate code")]
    GenerationExhausted,

    /// There is no link with the code
    #[error("Not found")]
    NotFound,

    /// The storage failed
    #[error("Storage error")]
    Storage(#[source] storage::Error),
}

impl From<storage::Error> for Error {
    fn from(err: storage::Error) -> Self {
        match err {
            storage::Error::UniqueViolation(_) => Self::CodeConflict,
            err @ storage::Error::Connection(_) => {
                tracing::error!("Storage failed: {err}");

                Self::Storage(err)
            }
        }
    }
}

/// Result type for all registry operations
pub type Result<T> = core::result::Result<T, Error>;

/// Parse and validate a destination URL
///
/// Only absolute URLs with a host are accepted
///
/// ```rust
/// assert!(parse_url("https://www.example.com/").is_ok());
/// assert!(parse_url("not-a-url").is_err());
/// ```
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|_| Error::InvalidUrl)?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(Error::InvalidUrl),
    }
}

/// Normalize and validate an explicit code
///
/// Surrounding whitespace is removed, an empty code counts as no code at all
pub fn parse_code(code: Option<&str>) -> Result<Option<&str>> {
    match code.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) if codes::is_valid(code) => Ok(Some(code)),
        Some(_) => Err(Error::InvalidCode),
    }
}

/// The link registry
#[derive(Clone)]
pub struct Registry<S: Storage> {
    /// Storage holding all links
    storage: S,
}

impl<S: Storage> Registry<S> {
    /// Create a registry on top of the storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a link
    ///
    /// Without an explicit code, a code is generated with the given source of randomness
    pub async fn create<R>(&self, url: &str, code: Option<&str>, rng: &mut R) -> Result<Link>
    where
        R: Rng + Send + ?Sized,
    {
        parse_url(url)?;

        let code = match parse_code(code)? {
            Some(code) => {
                if self.storage.find_single_link_by_code(code).await?.is_some() {
                    tracing::debug!(r#"Code "{code}" already exists"#);

                    return Err(Error::CodeConflict);
                }

                code.to_string()
            }
            None => self.generate_code(rng).await?,
        };

        let values = CreateLinkValues {
            code: &code,
            url,
            created_at: Utc::now(),
        };

        let link = self.storage.create_link(&values).await?;

        tracing::info!(r#"Created link "{}" to: {}"#, link.code, link.url);

        Ok(link)
    }

    /// Find a free code, giving up after a fixed number of attempts
    async fn generate_code<R>(&self, rng: &mut R) -> Result<String>
    where
        R: Rng + Send + ?Sized,
    {
        for attempt in 1..=codes::MAX_GENERATION_ATTEMPTS {
            let candidate = codes::generate(rng);

            if self
                .storage
                .find_single_link_by_code(&candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }

            tracing::debug!(r#"Generated code "{candidate}" is taken (attempt {attempt})"#);
        }

        tracing::error!(
            "Could not generate a free code in {} attempts",
            codes::MAX_GENERATION_ATTEMPTS
        );

        Err(Error::GenerationExhausted)
    }

    /// Resolve a code into its link, counting the click
    pub async fn resolve(&self, code: &str) -> Result<Link> {
        if !codes::is_valid(code) {
            return Err(Error::NotFound);
        }

        self.storage
            .increment_clicks(code, Utc::now())
            .await?
            .ok_or(Error::NotFound)
    }

    /// Get a single link, without side effects
    pub async fn get(&self, code: &str) -> Result<Link> {
        tracing::debug!(r#"Looking up link "{code}""#);

        if !codes::is_valid(code) {
            return Err(Error::NotFound);
        }

        self.storage
            .find_single_link_by_code(code)
            .await?
            .ok_or(Error::NotFound)
    }

    /// List all links, newest first
    pub async fn list(&self) -> Result<Vec<Link>> {
        let links = self.storage.find_all_links().await?;

        tracing::debug!("Listing {} links", links.len());

        Ok(links)
    }

    /// Permanently delete a link
    pub async fn delete(&self, code: &str) -> Result<()> {
        if !codes::is_valid(code) {
            return Err(Error::NotFound);
        }

        if self.storage.delete_link(code).await? {
            tracing::info!(r#"Deleted link "{code}""#);

            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }

    /// Check if the storage behind the registry can be reached
    pub async fn health_check(&self) -> Result<()> {
        self.storage.health_check().await?;

        tracing::trace!("Storage is healthy");

        Ok(())
    }
}
