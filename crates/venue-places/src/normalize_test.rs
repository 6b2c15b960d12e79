use serde_json::json;

use super::*;

fn raw(value: serde_json::Value) -> RawPlaceRecord {
    RawPlaceRecord(value)
}

fn full_record() -> RawPlaceRecord {
    raw(json!({
        "name": "places/ChIJ-abc123",
        "id": "ChIJ-abc123",
        "displayName": { "text": "Pizzeria Napoli", "languageCode": "en" },
        "formattedAddress": "12 Herzl St, Ashkelon, Israel",
        "location": { "latitude": 31.668, "longitude": 34.574 },
        "rating": 4.6,
        "userRatingCount": 812,
        "priceLevel": "PRICE_LEVEL_MODERATE",
        "currentOpeningHours": { "openNow": true },
        "photos": [
            { "name": "places/ChIJ-abc123/photos/p1", "widthPx": 800 },
            { "name": "places/ChIJ-abc123/photos/p2" },
            { "name": "places/ChIJ-abc123/photos/p3" },
            { "name": "places/ChIJ-abc123/photos/p4" }
        ],
        "types": ["pizza_restaurant", "restaurant", "food"],
        "googleMapsUri": "https://maps.google.com/?cid=42",
        "businessStatus": "OPERATIONAL"
    }))
}

#[test]
fn normalizes_complete_record() {
    let result = normalize_place(&full_record());

    assert_eq!(result.id, "ChIJ-abc123");
    assert_eq!(result.name, "Pizzeria Napoli");
    assert_eq!(result.address, "12 Herzl St, Ashkelon, Israel");
    assert!((result.location.lat - 31.668).abs() < f64::EPSILON);
    assert_eq!(result.rating, Some(4.6));
    assert_eq!(result.rating_count, Some(812));
    assert_eq!(result.price_level, Some(2));
    assert_eq!(result.open_state, OpenState::Open);
    assert_eq!(result.business_status, BusinessStatus::Operational);
    assert_eq!(result.tags, vec!["pizza_restaurant", "restaurant", "food"]);
    assert_eq!(result.maps_url, "https://maps.google.com/?cid=42");
}

#[test]
fn caps_photo_refs() {
    let result = normalize_place(&full_record());
    assert_eq!(result.photo_refs.len(), MAX_PHOTO_REFS);
    assert_eq!(result.photo_refs[0], "places/ChIJ-abc123/photos/p1");
}

#[test]
fn id_comes_from_final_path_segment() {
    let result = normalize_place(&raw(json!({ "name": "places/XYZ", "id": "other" })));
    assert_eq!(result.id, "XYZ");
}

#[test]
fn id_falls_back_to_bare_id_field() {
    let result = normalize_place(&raw(json!({ "id": "bare-id" })));
    assert_eq!(result.id, "bare-id");
    assert_eq!(
        result.maps_url,
        "https://www.google.com/maps/place/?q=place_id:bare-id"
    );
}

#[test]
fn empty_record_degrades_to_defaults() {
    let result = normalize_place(&raw(json!({})));
    assert_eq!(result.id, "");
    assert_eq!(result.name, "");
    assert!(result.rating.is_none());
    assert!(result.rating_count.is_none());
    assert!(result.price_level.is_none());
    assert_eq!(result.open_state, OpenState::Unknown);
    assert_eq!(result.business_status, BusinessStatus::Operational);
    assert!(result.photo_refs.is_empty());
    assert!(result.tags.is_empty());
    assert_eq!(result.maps_url, "");
}

#[test]
fn malformed_fields_never_panic() {
    let result = normalize_place(&raw(json!({
        "name": 17,
        "displayName": "not-an-object",
        "location": { "latitude": "north" },
        "rating": "five",
        "userRatingCount": -3,
        "priceLevel": 9,
        "currentOpeningHours": { "openNow": "yes" },
        "photos": { "name": "not-an-array" },
        "types": [1, "cafe", null]
    })));
    assert_eq!(result.name, "");
    assert!(result.rating.is_none());
    assert!(result.rating_count.is_none());
    assert!(result.price_level.is_none());
    assert_eq!(result.open_state, OpenState::Unknown);
    assert!(result.photo_refs.is_empty());
    assert_eq!(result.tags, vec!["cafe"]);
}

#[test]
fn non_json_object_record_is_handled() {
    let result = normalize_place(&raw(json!("just a string")));
    assert_eq!(result.id, "");
}

#[test]
fn price_level_accepts_integer_form() {
    let result = normalize_place(&raw(json!({ "priceLevel": 3 })));
    assert_eq!(result.price_level, Some(3));
}

#[test]
fn unspecified_price_level_is_none() {
    let result = normalize_place(&raw(json!({ "priceLevel": "PRICE_LEVEL_UNSPECIFIED" })));
    assert!(result.price_level.is_none());
}

#[test]
fn closed_now_maps_to_closed() {
    let result = normalize_place(&raw(json!({ "currentOpeningHours": { "openNow": false } })));
    assert_eq!(result.open_state, OpenState::Closed);
}

#[test]
fn out_of_range_rating_is_dropped() {
    let result = normalize_place(&raw(json!({ "rating": 7.5 })));
    assert!(result.rating.is_none());
}

#[test]
fn photo_handles_that_embed_credentials_are_skipped() {
    let result = normalize_place(&raw(json!({
        "photos": [
            { "name": "https://places.googleapis.com/v1/x/media?key=SECRET" },
            { "name": "places/A/photos/ok" }
        ]
    })));
    assert_eq!(result.photo_refs, vec!["places/A/photos/ok"]);
}

#[test]
fn temporarily_closed_status_is_kept_and_flagged() {
    let result = normalize_place(&raw(json!({ "businessStatus": "CLOSED_TEMPORARILY" })));
    assert_eq!(result.business_status, BusinessStatus::TempClosed);
}
