use crate::app_config::{AppConfig, CacheBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(value) => Ok(value),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let places_api_key = lookup("VENUE_PLACES_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    let places_base_url = or_default("VENUE_PLACES_BASE_URL", "https://places.googleapis.com/");
    let geocode_base_url = or_default("VENUE_GEOCODE_BASE_URL", "https://maps.googleapis.com/");
    let http_timeout_ms = parse_u64("VENUE_HTTP_TIMEOUT_MS", "8000")?;

    let cache_enabled = parse_bool(&or_default("VENUE_CACHE_ENABLED", "true"))
        .ok_or_else(|| invalid("VENUE_CACHE_ENABLED", "expected true or false".to_string()))?;
    let cache_backend = if cache_enabled {
        parse_cache_backend(&or_default("VENUE_CACHE_BACKEND", "redis"))?
    } else {
        CacheBackend::Disabled
    };
    let redis_url = or_default("VENUE_REDIS_URL", "redis://127.0.0.1:6379");
    let cache_timeout_ms = parse_u64("VENUE_CACHE_TIMEOUT_MS", "7000")?;

    let max_results = parse_positive("VENUE_MAX_RESULTS", "20")?;
    let max_pages = parse_positive("VENUE_MAX_PAGES", "3")?;

    let geocode_memo_capacity = parse_u64("VENUE_GEOCODE_MEMO_CAPACITY", "1024")?;
    let geocode_memo_ttl_secs = parse_u64("VENUE_GEOCODE_MEMO_TTL_SECS", "86400")?;
    let log_level = or_default("VENUE_LOG_LEVEL", "info");

    Ok(AppConfig {
        places_api_key,
        places_base_url,
        geocode_base_url,
        http_timeout_ms,
        cache_backend,
        redis_url,
        cache_timeout_ms,
        max_results,
        max_pages,
        geocode_memo_capacity,
        geocode_memo_ttl_secs,
        log_level,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string into a `CacheBackend` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_cache_backend(s: &str) -> Result<CacheBackend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "redis" => Ok(CacheBackend::Redis),
        "memory" | "moka" => Ok(CacheBackend::Memory),
        "none" | "noop" => Ok(CacheBackend::Disabled),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VENUE_CACHE_BACKEND".to_string(),
            reason: format!("unknown backend \"{other}\" (expected redis, memory or none)"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
