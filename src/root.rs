//! The root!
//!
//! Browser-facing redirect for short codes, following a short link lands here

use std::str::Utf8Error;

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::LOCATION;
use percent_encoding::percent_decode_str;

use crate::api::Error;
use crate::api::storage_error;
use crate::clicks::ClickContext;
use crate::resolver::Resolution;
use crate::resolver::resolve;
use crate::storage::Storage;
use crate::validation::is_safe_redirect_url;

/// The root!
///
/// All wildcard requests end up in this function.
///
/// The path is the short code, the stored URL is checked once more before it is used as
/// `Location`: links that are not safe to redirect to are treated as not found.
pub async fn root<S: Storage>(
    context: ClickContext,
    Extension(storage): Extension<S>,
    uri: Uri,
) -> Result<(StatusCode, HeaderMap), Error> {
    let short_code = uri.path().trim_matches('/');
    let short_code = url_decode_short_code(short_code)
        .map_err(|_| Error::bad_request("URL contains invalid UTF-8 characters"))?;

    tracing::debug!("Looking for short code: /{short_code}");

    let resolution = resolve(&storage, &short_code, &context)
        .await
        .map_err(storage_error)?;

    let Resolution::Resolved(link) = resolution else {
        return Err(Error::not_found("Link not found"));
    };

    if !is_safe_redirect_url(&link.url) {
        tracing::warn!(
            link_id = %link.id,
            r#"Short code "{short_code}" points to an unsafe URL, refusing to redirect"#
        );

        return Err(Error::not_found("Link not found"));
    }

    let location = HeaderValue::from_str(&link.url).map_err(|err| {
        tracing::warn!(link_id = %link.id, "Stored URL is not a valid header value: {err}");

        Error::not_found("Link not found")
    })?;

    tracing::debug!(r#"Short code "{short_code}" redirecting to: {}"#, link.url);

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Ok((StatusCode::TEMPORARY_REDIRECT, headers))
}

/// URL decode short code
///
/// Uses percentage encoding for the decoding, might error in case of invalid UTF-8
fn url_decode_short_code(short_code: &str) -> Result<String, Utf8Error> {
    let decoded = percent_decode_str(short_code);

    decoded.decode_utf8().map(|decoded| decoded.to_string())
}
