//! URL handling module for Listing-Scout
//!
//! This module turns raw command-line arguments into listing URLs and derives
//! the matching detail-page URL for each listing.

mod normalize;

use crate::{UrlError, UrlResult};
use std::fmt;

pub use normalize::{absolutize_href, strip_query};

/// Path suffix appended to a listing URL to reach its detail page
pub const DEFAULT_DETAIL_SUFFIX: &str = "/detail";

/// A listing page URL with its query string removed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingUrl(String);

impl ListingUrl {
    /// Parses a raw input string into a listing URL
    ///
    /// The query string is stripped first. Blank input (empty or whitespace
    /// only after stripping) is not an error: it yields `Ok(None)` so the
    /// caller can skip it.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ListingUrl))` - A usable listing URL
    /// * `Ok(None)` - The input was blank
    /// * `Err(UrlError)` - The input is not an absolute HTTP(S) URL
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_scout::ListingUrl;
    ///
    /// let url = ListingUrl::parse("https://example.com/build/1?from=list").unwrap().unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/build/1");
    ///
    /// assert!(ListingUrl::parse("   ").unwrap().is_none());
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Option<Self>> {
        let stripped = strip_query(raw);
        if stripped.trim().is_empty() {
            return Ok(None);
        }

        let parsed = ::url::Url::parse(stripped).map_err(|e| UrlError::Parse {
            url: stripped.to_string(),
            message: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Some(Self(stripped.to_string()))),
            other => Err(UrlError::InvalidScheme(other.to_string())),
        }
    }

    /// Returns the listing URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the detail-page URL by appending `suffix` verbatim
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_scout::ListingUrl;
    ///
    /// let url = ListingUrl::parse("https://example.com/build/1?a=b").unwrap().unwrap();
    /// assert_eq!(url.detail_url("/detail"), "https://example.com/build/1/detail");
    /// ```
    pub fn detail_url(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }
}

impl fmt::Display for ListingUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ListingUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
