//! Canonical query shapes produced by the upstream planner.
//!
//! A [`CanonicalQuery`] is already resolved: language, cuisine keys and
//! anchors have been chosen before it reaches this workspace. Serialized
//! form is internally tagged on `method` so planners in other processes can
//! hand queries over as plain JSON.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Circular region used either as a soft bias or a hard restriction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasCircle {
    pub center: LatLng,
    pub radius_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuery {
    pub query_text: String,
    pub language_code: String,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub bias: Option<BiasCircle>,
}

impl TextQuery {
    /// Returns a copy of this query with the bias circle removed.
    #[must_use]
    pub fn without_bias(&self) -> Self {
        Self {
            bias: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub center: LatLng,
    pub radius_meters: f64,
    /// Canonical cuisine/type keys, not provider tokens.
    #[serde(default)]
    pub included_types: Vec<String>,
    pub language_code: String,
    #[serde(default)]
    pub region_code: Option<String>,
}

/// Which second-phase search a [`LandmarkPlan`] runs once its anchor is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfterGeocode {
    Nearby,
    TextWithBias,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkPlan {
    pub landmark_query: String,
    pub after_geocode: AfterGeocode,
    pub radius_meters: f64,
    pub keyword: String,
    pub language_code: String,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub resolved_center: Option<LatLng>,
}

impl LandmarkPlan {
    /// Returns a copy of the plan with its anchor filled in.
    #[must_use]
    pub fn with_center(&self, center: LatLng) -> Self {
        Self {
            resolved_center: Some(center),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum CanonicalQuery {
    #[serde(rename = "TEXT_QUERY")]
    Text(TextQuery),
    #[serde(rename = "NEARBY_QUERY")]
    Nearby(NearbyQuery),
    #[serde(rename = "LANDMARK_PLAN")]
    Landmark(LandmarkPlan),
}

impl CanonicalQuery {
    #[must_use]
    pub fn method(&self) -> SearchMethod {
        match self {
            Self::Text(_) => SearchMethod::Text,
            Self::Nearby(_) => SearchMethod::Nearby,
            Self::Landmark(_) => SearchMethod::Landmark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    Text,
    Nearby,
    Landmark,
}

impl SearchMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Nearby => "nearby",
            Self::Landmark => "landmark",
        }
    }
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
