//! Utility functions for the API

use crate::api::Error;
use crate::links::Link;
use crate::storage;
use crate::storage::Storage;

/// Map a storage error into a generic `500 Internal Server Error`
///
/// The storage details are logged, never returned
pub fn storage_error(err: storage::Error) -> Error {
    tracing::error!("Storage failure: {err}");

    Error::internal_server_error()
}

/// Fetch link from storage
///
/// Does not count as a click
pub async fn fetch_link<S: Storage>(storage: &S, short_code: &str) -> Result<Link, Error> {
    storage
        .find_single_link_by_short_code(short_code)
        .await
        .map_err(storage_error)?
        .map_or_else(|| Err(Error::not_found("Link not found")), Ok)
}
