//! String-level URL normalization
//!
//! Listing URLs are kept as the exact strings the operator supplied, minus any
//! query string. These helpers never re-serialize through `Url`, so paths,
//! trailing slashes and percent-encoding survive untouched.

/// Removes everything from the first `?` onward
///
/// # Examples
///
/// ```
/// use listing_scout::url::strip_query;
///
/// assert_eq!(strip_query("https://example.com/a?x=1?y=2"), "https://example.com/a");
/// assert_eq!(strip_query("https://example.com/a"), "https://example.com/a");
/// ```
pub fn strip_query(raw: &str) -> &str {
    match raw.find('?') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Makes a scheme-relative href (`//host/path`) absolute by prefixing `https:`
///
/// Any other href is returned unchanged.
pub fn absolutize_href(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    }
}
