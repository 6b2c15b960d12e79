//! Integration tests for `PlacesClient` using wiremock HTTP mocks.
//!
//! Each test stands up a local server so no real network traffic is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venue_core::{BusinessStatus, LatLng};
use venue_places::{
    CircleArea, NearbySearchRequest, PageCaps, PlacesClient, PlacesError, SearchRequest,
    TextSearchRequest,
};

fn test_client(server: &MockServer) -> PlacesClient {
    PlacesClient::with_base_urls("test-key", 2_000, &server.uri(), &server.uri())
        .expect("client construction should not fail")
}

fn text_request() -> SearchRequest {
    SearchRequest::Text(TextSearchRequest {
        text_query: "pizza near Ashkelon".into(),
        language_code: "en".into(),
        region_code: Some("IL".into()),
        location_bias: None,
        page_size: 20,
    })
}

fn places_json(ids: &[&str]) -> Vec<serde_json::Value> {
    ids.iter()
        .map(|id| {
            json!({
                "name": format!("places/{id}"),
                "displayName": { "text": format!("Venue {id}") },
                "businessStatus": "OPERATIONAL"
            })
        })
        .collect()
}

#[tokio::test]
async fn search_page_sends_credential_and_field_mask_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(header("X-Goog-Api-Key", "test-key"))
        .and(body_partial_json(json!({
            "textQuery": "pizza near Ashkelon",
            "languageCode": "en",
            "regionCode": "IL"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": places_json(&["a", "b"])
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .search_page(&text_request(), None)
        .await
        .expect("should parse page");

    assert_eq!(page.places.len(), 2);
    assert!(page.continuation().is_none());

    let requests = server.received_requests().await.unwrap();
    let mask = requests[0]
        .headers
        .get("X-Goog-FieldMask")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(mask.contains("places.businessStatus"), "{mask}");
    assert!(mask.contains("nextPageToken"), "{mask}");
}

#[tokio::test]
async fn fetch_all_follows_tokens_and_dedups_repeated_ids() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(body_partial_json(json!({ "pageToken": "page-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": places_json(&["c", "d", "e", "f"])
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": places_json(&["a", "b", "c", "d", "e"]),
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client
        .fetch_all(
            &text_request(),
            PageCaps {
                result_cap: 50,
                page_cap: 3,
            },
        )
        .await
        .expect("pagination should succeed");

    // 5 + 4 - 3 repeated ids
    assert_eq!(out.results.len(), 6);
    assert_eq!(out.pages_fetched, 2);
}

#[tokio::test]
async fn fetch_all_never_exceeds_page_cap_with_endless_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": places_json(&["same"]),
            "nextPageToken": "forever"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client
        .fetch_all(
            &text_request(),
            PageCaps {
                result_cap: 100,
                page_cap: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(out.results.len(), 1);
    assert_eq!(out.pages_fetched, 3);
}

#[tokio::test]
async fn nearby_search_drops_permanently_closed_venues() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchNearby"))
        .and(body_partial_json(json!({
            "includedTypes": ["italian_restaurant"],
            "locationRestriction": { "circle": { "radius": 1500.0 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": [
                { "name": "places/open", "businessStatus": "OPERATIONAL" },
                { "name": "places/closed", "businessStatus": "CLOSED_PERMANENTLY" },
                { "name": "places/paused", "businessStatus": "CLOSED_TEMPORARILY" },
                { "name": "places/unknown" }
            ]
        })))
        .mount(&server)
        .await;

    let request = SearchRequest::Nearby(NearbySearchRequest {
        included_types: vec!["italian_restaurant".into()],
        max_result_count: 20,
        location_restriction: CircleArea::new(LatLng::new(32.08, 34.78), 1500.0),
        language_code: "he".into(),
        region_code: None,
    });

    let client = test_client(&server);
    let out = client
        .fetch_all(
            &request,
            PageCaps {
                result_cap: 20,
                page_cap: 3,
            },
        )
        .await
        .unwrap();

    let ids: Vec<&str> = out.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["open", "paused", "unknown"]);
    assert_eq!(out.results[1].business_status, BusinessStatus::TempClosed);
    assert_eq!(out.status_counts.dropped_perm_closed, 1);
    assert_eq!(out.status_counts.missing_status, 1);
}

#[tokio::test]
async fn provider_error_status_is_propagated_not_emptied() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .fetch_all(
            &text_request(),
            PageCaps {
                result_cap: 20,
                page_cap: 3,
            },
        )
        .await
        .unwrap_err();

    match err {
        PlacesError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_provider_surfaces_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "places": [] }))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&server)
        .await;

    let client = PlacesClient::with_base_urls("test-key", 200, &server.uri(), &server.uri())
        .expect("client construction should not fail");
    let err = client.search_page(&text_request(), None).await.unwrap_err();

    assert!(
        matches!(err, PlacesError::Timeout { timeout_ms: 200, .. }),
        "expected Timeout, got {err:?}"
    );
}

#[tokio::test]
async fn malformed_page_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.search_page(&text_request(), None).await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }), "{err:?}");
}

#[tokio::test]
async fn geocode_returns_first_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Azrieli Center"))
        .and(query_param("key", "test-key"))
        .and(query_param("language", "en"))
        .and(query_param("region", "il"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 32.0745, "lng": 34.7920 } } },
                { "geometry": { "location": { "lat": 1.0, "lng": 1.0 } } }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let center = client
        .geocode("Azrieli Center", "en", Some("IL"))
        .await
        .expect("geocode should succeed");

    assert_eq!(center, Some(LatLng::new(32.0745, 34.7920)));
}

#[tokio::test]
async fn geocode_zero_results_is_a_miss_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let center = client.geocode("Nowhere Land", "en", None).await.unwrap();
    assert!(center.is_none());
}

#[tokio::test]
async fn geocode_denied_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.geocode("Azrieli Center", "en", None).await.unwrap_err();
    match err {
        PlacesError::GeocodeStatus { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert!(message.contains("invalid"));
        }
        other => panic!("expected GeocodeStatus, got {other:?}"),
    }
}
