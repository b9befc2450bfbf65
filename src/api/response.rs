//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::registry;

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }
}

impl From<registry::Error> for Error {
    fn from(err: registry::Error) -> Self {
        match err {
            registry::Error::InvalidUrl | registry::Error::InvalidCode => Self::bad_request(err),
            registry::Error::CodeConflict => Self::conflict(err),
            registry::Error::NotFound => Self::not_found(err),
            registry::Error::GenerationExhausted => Self::internal_server_error(err),
            registry::Error::Storage(source) => {
                Self::internal_server_error("Storage error").with_description(source)
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper<D>
where
    D: Serialize,
{
    error: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<D>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
                description: self.description,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;

    #[test]
    fn test_from_registry_error() {
        let cases = [
            (registry::Error::InvalidUrl, StatusCode::BAD_REQUEST, "Invalid URL"),
            (
                registry::Error::InvalidCode,
                StatusCode::BAD_REQUEST,
                "Code must match [A-Za-z0-9]{6,8}",
            ),
            (registry::Error::CodeConflict, StatusCode::CONFLICT, "Code already exists"),
            (registry::Error::NotFound, StatusCode::NOT_FOUND, "Not found"),
            (
                registry::Error::GenerationExhausted,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate code",
            ),
        ];

        for (err, status_code, message) in cases {
            let error = Error::from(err);

            assert_eq!(status_code, error.status_code);
            assert_eq!(message, error.message);
            assert_eq!(None, error.description);
        }
    }

    #[test]
    fn test_from_storage_error() {
        let err = registry::Error::Storage(storage::Error::Connection("pool timed out".to_string()));
        let error = Error::from(err);

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, error.status_code);
        assert_eq!("Storage error", error.message);
        assert_eq!(
            Some("Connection error: pool timed out".to_string()),
            error.description
        );
    }
}
