//! Builds the provider request each canonical query will send.
//!
//! Executors and the cache guard both go through these functions, so the
//! request that gets hashed into a cache key is the request that gets sent.

use venue_core::{
    AfterGeocode, BiasCircle, CanonicalQuery, LandmarkPlan, LatLng, NearbyQuery, SearchMethod,
    TextQuery,
};
use venue_places::{
    page_size_for, CircleArea, NearbySearchRequest, PageCaps, SearchRequest, TextSearchRequest,
};

use crate::cuisine::resolve_types;

/// Text search; the bias circle is attached only when the query carries one.
#[must_use]
pub fn text_request(query: &TextQuery, caps: PageCaps) -> SearchRequest {
    SearchRequest::Text(TextSearchRequest {
        text_query: query.query_text.trim().to_owned(),
        language_code: query.language_code.clone(),
        region_code: query.region_code.clone(),
        location_bias: query.bias.map(CircleArea::from),
        page_size: page_size_for(caps.result_cap),
    })
}

/// Nearby search restricted to the query's circle.
#[must_use]
pub fn nearby_request(query: &NearbyQuery, caps: PageCaps) -> SearchRequest {
    SearchRequest::Nearby(NearbySearchRequest {
        included_types: resolve_types(&query.included_types),
        max_result_count: page_size_for(caps.result_cap),
        location_restriction: CircleArea::new(query.center, query.radius_meters),
        language_code: query.language_code.clone(),
        region_code: query.region_code.clone(),
    })
}

/// Second-phase request of a landmark plan once its anchor is known.
#[must_use]
pub fn landmark_request(plan: &LandmarkPlan, center: LatLng, caps: PageCaps) -> SearchRequest {
    match plan.after_geocode {
        AfterGeocode::Nearby => nearby_request(
            &NearbyQuery {
                center,
                radius_meters: plan.radius_meters,
                included_types: vec![plan.keyword.clone()],
                language_code: plan.language_code.clone(),
                region_code: plan.region_code.clone(),
            },
            caps,
        ),
        AfterGeocode::TextWithBias => text_request(
            &TextQuery {
                query_text: plan.keyword.clone(),
                language_code: plan.language_code.clone(),
                region_code: plan.region_code.clone(),
                bias: Some(BiasCircle {
                    center,
                    radius_meters: plan.radius_meters,
                }),
            },
            caps,
        ),
    }
}

/// The first provider request a query would issue, if it is knowable
/// without a geocode round trip.
///
/// Landmark plans only qualify when they already carry a resolved center.
#[must_use]
pub fn planned_request(
    query: &CanonicalQuery,
    caps: PageCaps,
) -> Option<(SearchMethod, SearchRequest)> {
    match query {
        CanonicalQuery::Text(q) => Some((SearchMethod::Text, text_request(q, caps))),
        CanonicalQuery::Nearby(q) => Some((SearchMethod::Nearby, nearby_request(q, caps))),
        CanonicalQuery::Landmark(plan) => plan
            .resolved_center
            .map(|center| (SearchMethod::Landmark, landmark_request(plan, center, caps))),
    }
}
