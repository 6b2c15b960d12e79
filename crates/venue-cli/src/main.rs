mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use venue_cache::CacheProvider;
use venue_engine::Engine;

use crate::search::{LandmarkArgs, LocaleArgs, NearbyArgs, TextArgs};

#[derive(Debug, Parser)]
#[command(name = "venue-cli")]
#[command(about = "Run a canonical venue search against the place-search provider")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Free-text search, optionally biased towards a circle
    Text {
        #[command(flatten)]
        args: TextArgs,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Search around a coordinate for one or more cuisine/type keys
    Nearby {
        #[command(flatten)]
        args: NearbyArgs,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Geocode a landmark, then search around it
    Landmark {
        #[command(flatten)]
        args: LandmarkArgs,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Report which cache backend is in use and whether it is healthy
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = venue_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    let store = CacheProvider::from_config(&config).await;
    let engine = Engine::new(&config, store)?;

    match cli.command {
        Commands::Text { args, locale } => {
            search::run(&engine, search::text_query(args, locale)).await?;
        }
        Commands::Nearby { args, locale } => {
            search::run(&engine, search::nearby_query(args, locale)).await?;
        }
        Commands::Landmark { args, locale } => {
            search::run(&engine, search::landmark_query(args, locale)).await?;
        }
        Commands::Check => search::check(&engine).await?,
    }

    Ok(())
}
