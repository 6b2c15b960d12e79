//! Provider query execution: turns a [`venue_core::CanonicalQuery`] into
//! provider calls behind the cache, with bounded pagination, a single
//! low-result retry and business-status filtering on both cache paths.

pub mod context;
pub mod cuisine;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod geocode;
mod guard;
pub mod keys;
pub mod outcome;
pub mod request;
pub mod retry;

pub use context::RequestContext;
pub use dispatcher::Engine;
pub use error::EngineError;
pub use executor::Executor;
pub use geocode::Geocoder;
pub use keys::CacheKey;
pub use outcome::SearchOutcome;
pub use retry::RetryDecision;
