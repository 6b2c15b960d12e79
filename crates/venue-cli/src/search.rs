//! Search and health-check command handlers.

use clap::Args;
use tokio::sync::watch;
use venue_cache::CacheService;
use venue_core::{
    AfterGeocode, BiasCircle, CanonicalQuery, LandmarkPlan, LatLng, NearbyQuery, TextQuery,
};
use venue_engine::{Engine, RequestContext};

/// Language and region shared by every search command.
#[derive(Debug, Args)]
pub struct LocaleArgs {
    /// BCP-47 language code for result text
    #[arg(long, default_value = "en")]
    pub lang: String,
    /// CLDR region code (e.g. IL)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Args)]
pub struct TextArgs {
    /// Free-text query, e.g. "pizza near Ashkelon"
    pub query: String,
    /// Bias centre latitude (requires --bias-lng)
    #[arg(long, requires = "bias_lng", allow_hyphen_values = true)]
    pub bias_lat: Option<f64>,
    /// Bias centre longitude (requires --bias-lat)
    #[arg(long, requires = "bias_lat", allow_hyphen_values = true)]
    pub bias_lng: Option<f64>,
    /// Bias radius in metres
    #[arg(long, default_value = "10000")]
    pub bias_radius: f64,
}

#[derive(Debug, Args)]
pub struct NearbyArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
    /// Search radius in metres
    #[arg(long, default_value = "1500")]
    pub radius: f64,
    /// Canonical cuisine/type key; repeat for several
    #[arg(long = "type", value_name = "KEY")]
    pub types: Vec<String>,
}

#[derive(Debug, Args)]
pub struct LandmarkArgs {
    /// Landmark or city to geocode, e.g. "Azrieli Center"
    pub landmark: String,
    /// Cuisine key (nearby mode) or free-text keyword (text mode)
    #[arg(long, default_value = "restaurant")]
    pub keyword: String,
    /// Search radius around the landmark in metres
    #[arg(long, default_value = "1000")]
    pub radius: f64,
    /// Run a bias-weighted text search instead of a nearby search
    #[arg(long)]
    pub text: bool,
}

pub fn text_query(args: TextArgs, locale: LocaleArgs) -> CanonicalQuery {
    let bias = args
        .bias_lat
        .zip(args.bias_lng)
        .map(|(lat, lng)| BiasCircle {
            center: LatLng::new(lat, lng),
            radius_meters: args.bias_radius,
        });
    CanonicalQuery::Text(TextQuery {
        query_text: args.query,
        language_code: locale.lang,
        region_code: locale.region,
        bias,
    })
}

pub fn nearby_query(args: NearbyArgs, locale: LocaleArgs) -> CanonicalQuery {
    CanonicalQuery::Nearby(NearbyQuery {
        center: LatLng::new(args.lat, args.lng),
        radius_meters: args.radius,
        included_types: args.types,
        language_code: locale.lang,
        region_code: locale.region,
    })
}

pub fn landmark_query(args: LandmarkArgs, locale: LocaleArgs) -> CanonicalQuery {
    CanonicalQuery::Landmark(LandmarkPlan {
        landmark_query: args.landmark,
        after_geocode: if args.text {
            AfterGeocode::TextWithBias
        } else {
            AfterGeocode::Nearby
        },
        radius_meters: args.radius,
        keyword: args.keyword,
        language_code: locale.lang,
        region_code: locale.region,
        resolved_center: None,
    })
}

/// Runs one search and prints the outcome as pretty JSON on stdout.
///
/// Ctrl-C cancels the search at the next phase boundary.
pub async fn run<S>(engine: &Engine<S>, query: CanonicalQuery) -> anyhow::Result<()>
where
    S: CacheService + 'static,
{
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_tx.send(true).ok();
        }
    });

    let ctx = RequestContext::with_cancel(cancel_rx);
    tracing::info!(request_id = %ctx.request_id, method = %query.method(), "running search");

    let outcome = engine.search(&query, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Prints the active cache backend and its health.
pub async fn check<S>(engine: &Engine<S>) -> anyhow::Result<()>
where
    S: CacheService + 'static,
{
    let store = engine.cache();
    let healthy = match store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!(error = %e, "cache health check failed");
            false
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "cacheBackend": store.provider_name(),
            "cacheEnabled": store.is_enabled(),
            "healthy": healthy,
        }))?
    );
    Ok(())
}
