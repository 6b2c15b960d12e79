pub mod app_config;
pub mod config;
pub mod place;
pub mod query;

pub use app_config::{redact_url, AppConfig, CacheBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use place::{BusinessStatus, NormalizedResult, OpenState};
pub use query::{
    AfterGeocode, BiasCircle, CanonicalQuery, LandmarkPlan, LatLng, NearbyQuery, SearchMethod,
    TextQuery,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
