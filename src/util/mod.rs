//! Small input-validation helpers shared by the CLI layer.
use thiserror::Error;
use url::Url;

/// Path appended to the platform base URL to reach the aggregate feed.
const FEED_PATH: &str = "/feed/all.rss";

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(String),
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
}

/// Validate the platform base URL supplied on the command line.
///
/// Only `http` and `https` URLs with a host are accepted; everything the
/// pipeline fetches derives from this value.
pub fn validate_base_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| UrlError::Invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none() {
        return Err(UrlError::Invalid(format!("{raw}: missing host")));
    }
    Ok(url)
}

/// Build the aggregate feed endpoint from the platform base URL.
///
/// Trailing slashes on the base are stripped so `https://host/` and
/// `https://host` produce the same endpoint.
pub fn feed_endpoint(base: &str) -> String {
    format!("{}{FEED_PATH}", base.trim_end_matches('/'))
}

/// Validate the `--date` argument: a prefix of a `YYYYMMDDhhmmss` key.
///
/// Any non-empty all-digit string up to 14 characters is accepted; the
/// filter is a prefix match, so `2026`, `202602`, and a full 14-character
/// timestamp are all valid.
pub fn validate_date_key(raw: &str) -> Result<&str, String> {
    if raw.is_empty() || raw.len() > 14 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "date key must be 1-14 digits (a prefix of YYYYMMDDhhmmss), got {raw:?}"
        ));
    }
    Ok(raw)
}
