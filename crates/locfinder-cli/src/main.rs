mod host;
mod interactive;
mod oneshot;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "locfinder")]
#[command(about = "Find the nearest locations by postal code or current position")]
struct Cli {
    /// Dataset file path or http(s) URL. Overrides `LOCFINDER_DATASET`.
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every location in the dataset.
    Pins,
    /// Locations near the first location with this postal code.
    Search {
        postal_code: String,
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Locations near a position given on the command line.
    Near {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Convert a spreadsheet CSV export into the JSON dataset.
    Convert {
        input: PathBuf,
        #[arg(short, long, default_value = "output.json")]
        output: PathBuf,
    },
    /// Line-oriented session: `cp <code>`, `here`, `view <n>`, `close`,
    /// `clear`, `theme light|dark`, `quit`.
    Interactive {
        /// Position reported by `here`. Overrides `LOCFINDER_GEOLOCATION`.
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = locfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }
    tracing::debug!(env = %config.env, dataset = %config.dataset, "configuration loaded");

    match cli.command {
        Commands::Pins => oneshot::run_pins(&config).await,
        Commands::Search {
            postal_code,
            radius_km,
        } => {
            oneshot::apply_radius(&mut config, radius_km)?;
            oneshot::run_search(&config, &postal_code).await
        }
        Commands::Near {
            lat,
            lon,
            radius_km,
        } => {
            oneshot::apply_radius(&mut config, radius_km)?;
            oneshot::run_near(&config, host::position_arg(lat, lon)?).await
        }
        Commands::Convert { input, output } => oneshot::run_convert(&input, &output).await,
        Commands::Interactive { lat, lon } => {
            if let (Some(lat), Some(lon)) = (lat, lon) {
                config.geolocation = Some(host::position_arg(lat, lon)?);
            }
            interactive::run(&config).await
        }
    }
}
