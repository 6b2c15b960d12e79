use thiserror::Error;
use venue_cache::CacheError;
use venue_places::PlacesError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("provider error: {0}")]
    Provider(#[from] PlacesError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("search cancelled by caller")]
    Cancelled,
}
