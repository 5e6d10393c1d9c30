//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;
pub use utils::storage_error;

use crate::storage::Storage;

mod links;
mod request;
mod response;
mod utils;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let links = Router::new()
        .route("/resolve", post(links::resolve::<S>))
        .route("/{short_code}/clicks", get(links::clicks::<S>));

    Router::new().nest("/links", links)
}
