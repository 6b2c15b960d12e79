//! Wire types for the place-search and geocode endpoints.
//!
//! Request bodies are typed so the exact bytes sent to the provider can also
//! be hashed into a cache key. Response records are kept as raw JSON
//! ([`RawPlaceRecord`]) because individual fields are routinely missing or
//! malformed, and one bad record must never fail a whole page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use venue_core::{BiasCircle, LatLng};

/// The provider caps one page of text-search results at 20.
pub const MAX_PAGE_SIZE: usize = 20;

/// Page size to request for a given result cap.
#[must_use]
pub fn page_size_for(result_cap: usize) -> u32 {
    u32::try_from(result_cap.clamp(1, MAX_PAGE_SIZE)).unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Self {
            latitude: value.lat,
            longitude: value.lng,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// `{"circle": {...}}` wrapper used by both `locationBias` and `locationRestriction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleArea {
    pub circle: Circle,
}

impl CircleArea {
    #[must_use]
    pub fn new(center: LatLng, radius_meters: f64) -> Self {
        Self {
            circle: Circle {
                center: center.into(),
                radius: radius_meters,
            },
        }
    }
}

impl From<BiasCircle> for CircleArea {
    fn from(value: BiasCircle) -> Self {
        Self::new(value.center, value.radius_meters)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest {
    pub text_query: String,
    pub language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_bias: Option<CircleArea>,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySearchRequest {
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub location_restriction: CircleArea,
    pub language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
}

/// One provider search call, independent of which endpoint serves it.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Text(TextSearchRequest),
    Nearby(NearbySearchRequest),
}

impl SearchRequest {
    /// Path relative to the place-search base URL.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Text(_) => "v1/places:searchText",
            Self::Nearby(_) => "v1/places:searchNearby",
        }
    }

    /// Field mask sent with the request.
    ///
    /// Text search must also ask for `nextPageToken` or the provider never
    /// returns one.
    #[must_use]
    pub fn field_mask(&self) -> &'static str {
        match self {
            Self::Text(_) => TEXT_FIELD_MASK,
            Self::Nearby(_) => NEARBY_FIELD_MASK,
        }
    }

    /// JSON body for one page. `page_token` is only attached for text search;
    /// nearby search has no continuation.
    #[must_use]
    pub fn to_body(&self, page_token: Option<&str>) -> Value {
        match self {
            Self::Text(req) => {
                let mut body = serde_json::to_value(req).unwrap_or(Value::Null);
                if let (Some(token), Value::Object(map)) = (page_token, &mut body) {
                    map.insert("pageToken".to_string(), Value::String(token.to_string()));
                }
                body
            }
            Self::Nearby(req) => serde_json::to_value(req).unwrap_or(Value::Null),
        }
    }
}

const TEXT_FIELD_MASK: &str = "places.id,places.name,places.displayName,places.formattedAddress,places.location,places.rating,places.userRatingCount,places.priceLevel,places.currentOpeningHours.openNow,places.photos,places.types,places.googleMapsUri,places.businessStatus,nextPageToken";

const NEARBY_FIELD_MASK: &str = "places.id,places.name,places.displayName,places.formattedAddress,places.location,places.rating,places.userRatingCount,places.priceLevel,places.currentOpeningHours.openNow,places.photos,places.types,places.googleMapsUri,places.businessStatus";

/// An unvalidated place record exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawPlaceRecord(pub Value);

impl RawPlaceRecord {
    pub(crate) fn str_field(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    pub(crate) fn field(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// The raw `businessStatus` token, if present.
    #[must_use]
    pub fn business_status(&self) -> Option<&str> {
        self.str_field("/businessStatus")
    }
}

/// One page of a place search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub places: Vec<RawPlaceRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl SearchPage {
    /// Continuation token, treating an empty string as absent.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeCandidate {
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeGeometry {
    pub location: LatLng,
}
