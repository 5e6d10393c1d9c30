//! Links

use core::fmt;

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

use crate::validation::is_safe_redirect_url;
use crate::validation::is_valid_short_code;
use crate::validation::normalize_url;

/// A short code pointing to a destination URL
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Link {
    /// Link ID
    pub id: Uuid,

    /// Unique external identifier of the link
    pub short_code: String,

    /// Destination of the link, normalized when the link was created
    pub url: String,

    /// The account owning the link, ownership lives in the account store
    pub user_id: Uuid,

    /// Creation date
    pub created_at: NaiveDateTime,
}

/// Reasons a link can not be created
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidLink {
    /// Short code is not 6 to 8 alphanumeric characters
    ShortCode,

    /// URL is not something we are willing to redirect to
    UnsafeUrl,
}

impl std::error::Error for InvalidLink {}

impl fmt::Display for InvalidLink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidLink::ShortCode => {
                write!(f, "Short code must be 6 to 8 alphanumeric characters")
            }
            InvalidLink::UnsafeUrl => write!(f, "URL is not a safe redirect target"),
        }
    }
}

/// Validate the values of a new link
///
/// Returns the normalized URL to store
///
/// # Errors
///
/// When the short code is malformed or the URL is not a safe redirect target
pub fn validate_new_link(short_code: &str, url: &str) -> Result<String, InvalidLink> {
    if !is_valid_short_code(short_code) {
        return Err(InvalidLink::ShortCode);
    }

    if !is_safe_redirect_url(url) {
        return Err(InvalidLink::UnsafeUrl);
    }

    Ok(normalize_url(url))
}
