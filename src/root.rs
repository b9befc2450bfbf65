//! The root!
//!
//! The most important part of `TinyLink`, the actual redirect logic

use std::str::Utf8Error;

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::LOCATION;
use percent_encoding::percent_decode_str;

use crate::api::Error;
use crate::registry;
use crate::registry::Registry;
use crate::storage::Storage;

/// The root!
///
/// All wildcard requests end up in this function.
///
/// The path is resolved as code, every successful resolve counts as a click
pub async fn root<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
    uri: Uri,
) -> Result<(StatusCode, HeaderMap), Error> {
    let code = uri.path().trim_matches('/');
    let code = url_decode_code(code)
        .map_err(|_| Error::bad_request("URL contains invalid UTF-8 characters"))?;

    tracing::debug!("Looking for code: /{code}");

    let link = match registry.resolve(&code).await {
        Ok(link) => link,
        Err(registry::Error::NotFound) => {
            tracing::debug!(r#"Code "{code}" not found"#);

            return Err(registry::Error::NotFound.into());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::debug!(r#"Code "{code}" redirecting to: {}"#, link.url);

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location_header(&link.url)?);

    Ok((StatusCode::FOUND, headers))
}

/// URL decode code
///
/// Uses percentage encoding for the decoding, might error in case of invalid UTF-8
fn url_decode_code(code: &str) -> Result<String, Utf8Error> {
    let decoded = percent_decode_str(code);

    decoded.decode_utf8().map(|decoded| decoded.to_string())
}

/// Location header for a destination
///
/// Destinations are stored as provided, non-ASCII ones are sent in their serialized form
fn location_header(url: &str) -> Result<HeaderValue, Error> {
    // header values accept opaque bytes, so only ASCII goes through as is
    if url.is_ascii()
        && let Ok(value) = HeaderValue::from_str(url)
    {
        return Ok(value);
    }

    registry::parse_url(url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| Error::internal_server_error("Invalid destination URL"))
}
