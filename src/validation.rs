//! URL and short code validation
//!
//! Every function here answers with a definite value, they are used as inline gates while
//! handling requests: "could not parse" and "unsafe" lead to the same action for the caller.

use url::Url;

/// Patterns that never belong in a redirect target, matched case-insensitively
const SUSPICIOUS_PATTERNS: &[&str] = &[
    "javascript:",
    "data:",
    "vbscript:",
    "<script",
    "onerror=",
    "onclick=",
];

/// Minimum length of a short code
const SHORT_CODE_MIN_LENGTH: usize = 6;

/// Maximum length of a short code
const SHORT_CODE_MAX_LENGTH: usize = 8;

/// Is the candidate an absolute `http` or `https` URL?
///
/// ```rust
/// use lynkscope::validation::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(!is_valid_url("ftp://example.com/"));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Does the raw candidate contain any known script injection or non-navigational scheme?
///
/// Only rejects, it never rewrites the candidate.
pub fn contains_suspicious_patterns(candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();

    SUSPICIOUS_PATTERNS
        .iter()
        .any(|pattern| candidate.contains(pattern))
}

/// The single gate before treating a string as a redirect target
///
/// Needs a valid `http(s)` URL, without suspicious patterns and with a non-empty host.
pub fn is_safe_redirect_url(candidate: &str) -> bool {
    is_valid_url(candidate)
        && !contains_suspicious_patterns(candidate)
        && Url::parse(candidate)
            .is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

/// Canonical serialization of the URL, or the input as-is when it does not parse
pub fn normalize_url(candidate: &str) -> String {
    Url::parse(candidate).map_or_else(|_| candidate.to_string(), String::from)
}

/// Is the code 6 to 8 ASCII alphanumeric characters?
///
/// ```rust
/// use lynkscope::validation::is_valid_short_code;
///
/// assert!(is_valid_short_code("ab12CD"));
/// assert!(!is_valid_short_code("ab12-CD"));
/// ```
pub fn is_valid_short_code(code: &str) -> bool {
    // all ASCII, so the byte length is the character count
    code.chars().all(|ch| ch.is_ascii_alphanumeric())
        && (SHORT_CODE_MIN_LENGTH..=SHORT_CODE_MAX_LENGTH).contains(&code.len())
}

/// Host of the URL, or the input as-is when it does not parse
///
/// URLs without a host (like `mailto:`) result in an empty string.
pub fn extract_domain(candidate: &str) -> String {
    match Url::parse(candidate) {
        Ok(url) => url.host_str().unwrap_or_default().to_string(),
        Err(_) => candidate.to_string(),
    }
}
