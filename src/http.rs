// src/http.rs
// reqwest client construction and default headers

use crate::config::{CLIENT_ID, EmnoConfig};
use crate::error::{EmnoError, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// Auth header understood by the service
pub const TOKEN_HEADER: &str = "token";

/// Client identifier header
pub const CLIENT_HEADER: &str = "client";

/// Create the HTTP client used for every call made through one facade
pub fn create_client(config: &EmnoConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .build()?)
}

/// Headers sent with every request: JSON content type, auth token, client id
pub fn default_headers(config: &EmnoConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(CLIENT_HEADER),
        HeaderValue::from_static(CLIENT_ID),
    );
    let mut token = HeaderValue::from_str(&config.token)
        .map_err(|_| EmnoError::Config("token contains characters not allowed in a header".into()))?;
    token.set_sensitive(true);
    headers.insert(HeaderName::from_static(TOKEN_HEADER), token);
    Ok(headers)
}

/// Overlay per-call headers on the defaults; overrides win
pub fn merge_headers(defaults: &HeaderMap, overrides: Option<&HeaderMap>) -> HeaderMap {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (name, value) in overrides {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}
