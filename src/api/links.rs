//! Links API endpoints
//!
//! Everything related to the links management

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use rand_core::OsRng;
use rand_core::TryRngCore;
use serde::Deserialize;
use serde::Serialize;

use crate::links::Link;
use crate::registry::Registry;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// Link response going to the user
///
/// Basically filtering which fields are shown to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    /// Code used to identify the link by the root
    pub code: String,

    /// Url where root will redirect to
    pub url: String,

    /// Number of redirects
    pub click_count: u64,

    /// Moment of the last redirect
    pub last_clicked: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Create a response from a [`Link`](Link)
    fn from_link(link: Link) -> Self {
        Self {
            code: link.code,
            url: link.url,
            click_count: link.click_count,
            last_clicked: link.last_clicked,
        }
    }

    /// Create a response from multiple [`Link`](Link)s
    fn from_link_multiple(links: Vec<Link>) -> Vec<Self> {
        links.into_iter().map(Self::from_link).collect()
    }
}

/// Link response with all details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetailResponse {
    /// Public fields of the link
    #[serde(flatten)]
    pub link: LinkResponse,

    /// Creation date
    pub created_at: DateTime<Utc>,
}

impl LinkDetailResponse {
    /// Create a detailed response from a [`Link`](Link)
    fn from_link(link: Link) -> Self {
        let created_at = link.created_at;

        Self {
            link: LinkResponse::from_link(link),
            created_at,
        }
    }
}

/// Confirmation of a deletion
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Always `true`
    ok: bool,
}

/// List all links, newest first
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/links
/// ```
///
/// Response:
/// ```json
/// [ { "code": "aB3dE6", "url": "https://www.example.com/", "clickCount": 0, "lastClicked": null } ]
/// ```
pub async fn list<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
) -> Result<Success<Vec<LinkResponse>>, Error> {
    let links = registry.list().await?;

    Ok(Success::ok(LinkResponse::from_link_multiple(links)))
}

/// Get a single link
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/links/aB3dE6
/// ```
///
/// Response:
/// ```json
/// { "code": "aB3dE6", "url": "https://www.example.com/", "clickCount": 0, "lastClicked": null, "createdAt": "..." }
/// ```
pub async fn single<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
    PathParameters(code): PathParameters<String>,
) -> Result<Success<LinkDetailResponse>, Error> {
    let link = registry.get(&code).await?;

    Ok(Success::ok(LinkDetailResponse::from_link(link)))
}

/// Create link form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkForm {
    /// Url to create a link with
    url: Option<String>,

    /// Optional code, generated when absent or empty
    code: Option<String>,
}

/// Create a link based on the [`CreateLinkForm`](CreateLinkForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "url": "https://www.example.com/", "code": "example1" }' \
///     http://localhost:6000/api/links
/// ```
///
/// Response
/// ```json
/// { "code": "example1", "url": "https://www.example.com/", "clickCount": 0, "lastClicked": null }
/// ```
pub async fn create<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
    Form(form): Form<CreateLinkForm>,
) -> Result<Success<LinkResponse>, Error> {
    let url = form.url.unwrap_or_default();
    let mut rng = OsRng.unwrap_err();

    let link = registry
        .create(&url, form.code.as_deref(), &mut rng)
        .await?;

    Ok(Success::created(LinkResponse::from_link(link)))
}

/// Delete a link
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:6000/api/links/aB3dE6
/// ```
///
/// Response
/// ```json
/// { "ok": true }
/// ```
pub async fn delete<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
    PathParameters(code): PathParameters<String>,
) -> Result<Success<DeleteResponse>, Error> {
    registry.delete(&code).await?;

    Ok(Success::ok(DeleteResponse { ok: true }))
}
