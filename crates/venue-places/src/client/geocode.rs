//! Free-text place/landmark geocoding.

use venue_core::LatLng;

use crate::error::PlacesError;
use crate::types::GeocodeResponse;

use super::{join_endpoint, PlacesClient};

const GEOCODE_ENDPOINT: &str = "maps/api/geocode/json";

impl PlacesClient {
    /// Resolves a free-text place name to coordinates.
    ///
    /// Returns `Ok(None)` when the provider answers `ZERO_RESULTS`; that is a
    /// legitimate empty answer, not a failure.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::GeocodeStatus`] for any status other than `OK` or
    ///   `ZERO_RESULTS` (e.g. `REQUEST_DENIED`, `OVER_QUERY_LIMIT`).
    /// - [`PlacesError::Timeout`], [`PlacesError::UnexpectedStatus`],
    ///   [`PlacesError::Http`] as for [`PlacesClient::search_page`].
    /// - [`PlacesError::Deserialize`] if the body has an unexpected shape.
    pub async fn geocode(
        &self,
        address: &str,
        language_code: &str,
        region_code: Option<&str>,
    ) -> Result<Option<LatLng>, PlacesError> {
        let mut url = join_endpoint(&self.geocode_base_url, GEOCODE_ENDPOINT)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("address", address);
            pairs.append_pair("language", language_code);
            if let Some(region) = region_code {
                pairs.append_pair("region", &region.to_lowercase());
            }
            pairs.append_pair("key", &self.api_key);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(GEOCODE_ENDPOINT, e))?;
        let body = self.read_success_body(GEOCODE_ENDPOINT, response).await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed
                .results
                .into_iter()
                .next()
                .map(|candidate| candidate.geometry.location)),
            "ZERO_RESULTS" => {
                tracing::debug!(address, "geocode returned zero results");
                Ok(None)
            }
            _ => Err(PlacesError::GeocodeStatus {
                message: parsed
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string()),
                status: parsed.status,
            }),
        }
    }
}
