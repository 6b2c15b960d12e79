//! The canonical venue record every search returns.

use serde::{Deserialize, Serialize};

use crate::query::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenState {
    Open,
    Closed,
    Unknown,
}

/// Provider-reported operating state of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    Operational,
    TempClosed,
    PermClosed,
    Unknown,
}

impl BusinessStatus {
    /// Maps the provider's `businessStatus` token.
    ///
    /// A missing status is treated as operating; an unrecognised one is kept
    /// as [`BusinessStatus::Unknown`].
    #[must_use]
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw {
            None | Some("OPERATIONAL") => Self::Operational,
            Some("CLOSED_TEMPORARILY") => Self::TempClosed,
            Some("CLOSED_PERMANENTLY") => Self::PermClosed,
            Some(_) => Self::Unknown,
        }
    }

    #[must_use]
    pub fn is_servable(self) -> bool {
        self != Self::PermClosed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    /// 0 (free) through 4 (very expensive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    pub open_state: OpenState,
    pub business_status: BusinessStatus,
    /// Opaque photo handles; never a URL carrying a credential.
    #[serde(default)]
    pub photo_refs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub maps_url: String,
}
