//! All API endpoint setup

use axum::Router;
use axum::routing::get;

pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod links;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route("/links", get(links::list::<S>).post(links::create::<S>))
        .route(
            "/links/{code}",
            get(links::single::<S>).delete(links::delete::<S>),
        )
}
