pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod status_filter;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use normalize::normalize_place;
pub use pagination::{aggregate, Aggregated, PageCaps, PaginationState};
pub use status_filter::{retain_servable, screen_raw, Screened, StatusCounts};
pub use types::{
    page_size_for, Circle, CircleArea, NearbySearchRequest, Point, RawPlaceRecord, SearchPage,
    SearchRequest, TextSearchRequest, MAX_PAGE_SIZE,
};
