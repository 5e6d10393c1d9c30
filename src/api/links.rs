//! Links API endpoints
//!
//! Public by design, anyone may follow a short link

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::clicks::ClickContext;
use crate::resolver::Resolution;
use crate::resolver::resolve as resolve_short_code;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::utils::fetch_link;
use super::utils::storage_error;

/// Resolve form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveForm {
    /// Short code to resolve, used verbatim
    short_code: String,
}

/// Resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    /// Destination of the link, exactly as stored
    url: String,
}

/// Resolve a short code and record the click
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "shortCode": "ab12CD" }' \
///     http://localhost:6000/api/links/resolve
/// ```
///
/// Response:
/// ```json
/// { "url": "https://www.example.com/" }
/// ```
pub async fn resolve<S: Storage>(
    context: ClickContext,
    Extension(storage): Extension<S>,
    Form(form): Form<ResolveForm>,
) -> Result<Success<ResolveResponse>, Error> {
    let resolution = resolve_short_code(&storage, &form.short_code, &context)
        .await
        .map_err(storage_error)?;

    match resolution {
        Resolution::Resolved(link) => Ok(Success::ok(ResolveResponse { url: link.url })),
        Resolution::NotFound => Err(Error::not_found("Link not found")),
    }
}

/// Clicks response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClicksResponse {
    /// Short code of the link
    short_code: String,

    /// Number of times the link was resolved
    clicks: i64,
}

/// Count the clicks of a link
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/links/ab12CD/clicks
/// ```
///
/// Response:
/// ```json
/// { "shortCode": "ab12CD", "clicks": 42 }
/// ```
pub async fn clicks<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(short_code): PathParameters<String>,
) -> Result<Success<ClicksResponse>, Error> {
    let link = fetch_link(&storage, &short_code).await?;

    let clicks = storage
        .count_clicks_by_link(&link)
        .await
        .map_err(storage_error)?;

    Ok(Success::ok(ClicksResponse {
        short_code: link.short_code,
        clicks,
    }))
}
