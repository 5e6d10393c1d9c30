#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]
#![doc = include_str!("../README.md")]

use axum::Extension;
use axum::Router;
use axum::routing::get;
use axum_client_ip::ClientIpSource;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::router;
use crate::storage::Storage;

pub mod clicks;
pub mod links;
pub mod resolver;
pub mod storage;
pub mod validation;

mod api;
mod root;
#[cfg(test)]
mod tests;

/// Create the router for Lynkscope
///
/// The storage is created once and shared by every request
pub fn create_router<S: Storage>(storage: S) -> Router {
    Router::new()
        .nest("/api", router::<S>())
        .fallback(get(root::root::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors())
        .layer(ClientIpSource::ConnectInfo.into_extension())
        .layer(Extension(storage))
}

/// Short links are followed from anywhere, so any origin is allowed
fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
