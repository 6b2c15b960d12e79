//! HTTP client for the place-search and geocode endpoints.

mod fetch_all;
mod geocode;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{SearchPage, SearchRequest};

const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com/";
const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/";

/// Longest provider error body kept in [`PlacesError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for the place-search API.
///
/// Every call carries its own timeout. Non-2xx responses and timeouts are
/// returned as errors and never collapsed into an empty result, so callers
/// can tell "no venues" from "request failed".
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    places_base_url: Url,
    geocode_base_url: Url,
    timeout_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url.as_str())
            .field("geocode_base_url", &self.geocode_base_url.as_str())
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingCredential`] if `api_key` is blank, or
    /// [`PlacesError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_ms: u64) -> Result<Self, PlacesError> {
        Self::with_base_urls(
            api_key,
            timeout_ms,
            DEFAULT_PLACES_BASE_URL,
            DEFAULT_GEOCODE_BASE_URL,
        )
    }

    /// Creates a client with custom endpoint roots (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingCredential`] if `api_key` is blank,
    /// [`PlacesError::InvalidBaseUrl`] if either base URL does not parse, or
    /// [`PlacesError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn with_base_urls(
        api_key: &str,
        timeout_ms: u64,
        places_base_url: &str,
        geocode_base_url: &str,
    ) -> Result<Self, PlacesError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlacesError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_millis(timeout_ms.min(5_000)))
            .user_agent("venue-search/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            places_base_url: parse_base_url(places_base_url)?,
            geocode_base_url: parse_base_url(geocode_base_url)?,
            timeout_ms,
        })
    }

    /// Fetches one page of a text or nearby search.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Timeout`] if the call exceeds the configured timeout.
    /// - [`PlacesError::UnexpectedStatus`] on any non-2xx response.
    /// - [`PlacesError::Http`] on other network failures.
    /// - [`PlacesError::Deserialize`] if the body is not a search page.
    pub async fn search_page(
        &self,
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Result<SearchPage, PlacesError> {
        let endpoint = request.endpoint();
        let url = join_endpoint(&self.places_base_url, endpoint)?;

        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", request.field_mask())
            .json(&request.to_body(page_token))
            .send()
            .await
            .map_err(|e| self.classify(endpoint, e))?;

        let body = self.read_success_body(endpoint, response).await?;
        serde_json::from_str::<SearchPage>(&body).map_err(|e| PlacesError::Deserialize {
            context: endpoint.to_owned(),
            source: e,
        })
    }

    /// Maps a send/read failure, singling out local timeouts.
    fn classify(&self, endpoint: &str, err: reqwest::Error) -> PlacesError {
        if err.is_timeout() {
            PlacesError::Timeout {
                endpoint: endpoint.to_owned(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            PlacesError::Http(err.without_url())
        }
    }

    /// Asserts a 2xx status and returns the body text.
    async fn read_success_body(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<String, PlacesError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify(endpoint, e))?;

        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        Ok(body)
    }
}

/// Normalise: ensure the base URL ends with exactly one slash so relative
/// endpoint paths append rather than replace the last segment.
fn parse_base_url(raw: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url, PlacesError> {
    base.join(path).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
