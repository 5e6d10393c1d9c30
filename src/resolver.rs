//! Resolve short codes to their destination
//!
//! A lookup followed by a best-effort click insert. The two are never tied together: when the
//! click can not be saved the link still resolves.

use crate::clicks::ClickContext;
use crate::links::Link;
use crate::storage::Result;
use crate::storage::Storage;
use crate::validation::extract_domain;

/// Outcome of resolving a short code
#[derive(Debug)]
pub enum Resolution {
    /// The short code belongs to this link
    Resolved(Link),

    /// No link with this short code
    NotFound,
}

/// Resolve a short code and record the click
///
/// The short code is used verbatim, malformed codes will simply not be found.
///
/// # Errors
///
/// Only when the lookup itself fails, failing to save the click is logged and ignored.
pub async fn resolve<S: Storage>(
    storage: &S,
    short_code: &str,
    context: &ClickContext,
) -> Result<Resolution> {
    let Some(link) = storage.find_single_link_by_short_code(short_code).await? else {
        tracing::debug!(r#"Short code "{short_code}" not found"#);

        return Ok(Resolution::NotFound);
    };

    match storage.save_click(&link, context).await {
        Ok(click) => tracing::debug!(link_id = %link.id, click_id = %click.id, "Click saved"),
        Err(err) => {
            tracing::error!(link_id = %link.id, "Could not save click: {err}");
        }
    }

    tracing::debug!(
        r#"Short code "{short_code}" resolved to domain: {}"#,
        extract_domain(&link.url)
    );

    Ok(Resolution::Resolved(link))
}
