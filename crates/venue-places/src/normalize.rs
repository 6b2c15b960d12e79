//! Normalization from raw provider records to [`venue_core::NormalizedResult`].
//!
//! [`normalize_place`] is total: every field degrades to a safe default when
//! it is missing or has the wrong shape, so a single odd record can never
//! fail a search.

use serde_json::Value;
use venue_core::{BusinessStatus, LatLng, NormalizedResult, OpenState};

use crate::types::RawPlaceRecord;

/// Maximum number of photo handles kept per venue.
pub const MAX_PHOTO_REFS: usize = 3;

/// Normalizes a raw provider record into a [`NormalizedResult`].
#[must_use]
pub fn normalize_place(raw: &RawPlaceRecord) -> NormalizedResult {
    let id = extract_place_id(raw).unwrap_or_default();

    let name = raw
        .str_field("/displayName/text")
        .unwrap_or_default()
        .to_string();
    let address = raw
        .str_field("/formattedAddress")
        .or_else(|| raw.str_field("/shortFormattedAddress"))
        .unwrap_or_default()
        .to_string();

    let location = LatLng::new(
        raw.field("/location/latitude")
            .and_then(Value::as_f64)
            .unwrap_or_default(),
        raw.field("/location/longitude")
            .and_then(Value::as_f64)
            .unwrap_or_default(),
    );

    let rating = raw
        .field("/rating")
        .and_then(Value::as_f64)
        .filter(|r| r.is_finite() && (0.0..=5.0).contains(r));
    let rating_count = raw
        .field("/userRatingCount")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());

    let maps_url = raw
        .str_field("/googleMapsUri")
        .filter(|u| !u.is_empty())
        .map_or_else(|| fallback_maps_url(&id), str::to_string);

    NormalizedResult {
        name,
        address,
        location,
        rating,
        rating_count,
        price_level: raw.field("/priceLevel").and_then(parse_price_level),
        open_state: parse_open_state(raw),
        business_status: BusinessStatus::from_provider(raw.business_status()),
        photo_refs: extract_photo_refs(raw),
        tags: extract_tags(raw),
        maps_url,
        id,
    }
}

/// Extracts the stable place id from the final segment of the `name`
/// resource path (`places/{id}`), falling back to the bare `id` field.
fn extract_place_id(raw: &RawPlaceRecord) -> Option<String> {
    let from_path = raw
        .str_field("/name")
        .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
        .filter(|segment| !segment.is_empty());

    from_path
        .or_else(|| raw.str_field("/id").filter(|id| !id.is_empty()))
        .map(str::to_string)
}

/// Accepts both the enum spelling (`PRICE_LEVEL_MODERATE`) and a bare 0–4
/// integer. `PRICE_LEVEL_UNSPECIFIED` and anything out of range is `None`.
fn parse_price_level(value: &Value) -> Option<u8> {
    match value {
        Value::String(s) => match s.as_str() {
            "PRICE_LEVEL_FREE" => Some(0),
            "PRICE_LEVEL_INEXPENSIVE" => Some(1),
            "PRICE_LEVEL_MODERATE" => Some(2),
            "PRICE_LEVEL_EXPENSIVE" => Some(3),
            "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
            _ => None,
        },
        Value::Number(n) => n
            .as_u64()
            .filter(|level| *level <= 4)
            .and_then(|level| u8::try_from(level).ok()),
        _ => None,
    }
}

fn parse_open_state(raw: &RawPlaceRecord) -> OpenState {
    let open_now = raw
        .field("/currentOpeningHours/openNow")
        .or_else(|| raw.field("/regularOpeningHours/openNow"))
        .and_then(Value::as_bool);

    match open_now {
        Some(true) => OpenState::Open,
        Some(false) => OpenState::Closed,
        None => OpenState::Unknown,
    }
}

/// Photo resource names only. A handle that looks like a signed media URL is
/// skipped so no credential ever leaves this crate.
fn extract_photo_refs(raw: &RawPlaceRecord) -> Vec<String> {
    let Some(photos) = raw.field("/photos").and_then(Value::as_array) else {
        return Vec::new();
    };

    photos
        .iter()
        .filter_map(|photo| photo.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty() && !name.contains("key=") && !name.contains("://"))
        .take(MAX_PHOTO_REFS)
        .map(str::to_string)
        .collect()
}

fn extract_tags(raw: &RawPlaceRecord) -> Vec<String> {
    raw.field("/types")
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn fallback_maps_url(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!("https://www.google.com/maps/place/?q=place_id:{id}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
