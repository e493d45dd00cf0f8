//! Waze route CLI
//!
//! Command-line front end for the route calculator: travel time and distance
//! between two locations, geocoding and a reachability check.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use integration_waze::{
    AggregateOptions, Coordinate, MAX_ALTERNATIVES, Region, RouteCalculator, RouteOptions,
    RouteResult, VehicleType, WazeConfig, WazeRouteCalculator,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waze route CLI
#[derive(Parser)]
#[command(name = "waze-route")]
#[command(author, version, about = "Travel time and distance from Waze", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./waze.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Service region (US, NA, EU, IL, AU)
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Override the Waze host
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate routes between two locations
    ///
    /// Locations are either `lat,lon` pairs or free-text addresses.
    /// Example: waze-route route "Kaiserstraße 30 55116 Mainz" "50.084,8.247" -a 3
    Route(RouteArgs),

    /// Resolve a location to coordinates
    Geocode {
        /// Address or `lat,lon` pair
        location: String,
    },

    /// Check that the Waze service is reachable
    Check,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct RouteArgs {
    /// Start location
    from: String,

    /// Destination
    to: String,

    /// Number of alternative routes to request
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_ALTERNATIVES)))]
    alternatives: Option<u8>,

    /// Vehicle type (TAXI, MOTORCYCLE)
    #[arg(long)]
    vehicle: Option<VehicleType>,

    /// Avoid toll roads
    #[arg(long)]
    avoid_tolls: bool,

    /// Avoid ferries
    #[arg(long)]
    avoid_ferries: bool,

    /// Avoid roads that require a vignette or subscription
    #[arg(long)]
    avoid_subscription_roads: bool,

    /// Departure offset passed to the routing server
    #[arg(long, allow_negative_numbers = true)]
    time_delta: Option<i64>,

    /// Use typical durations instead of live traffic
    #[arg(long)]
    typical_time: bool,

    /// Ignore segments inside the start and destination areas
    #[arg(long)]
    stop_at_bounds: bool,
}

impl RouteArgs {
    /// Merge flags into the configured route options
    fn route_options(&self, base: RouteOptions) -> RouteOptions {
        let mut options = base;
        if let Some(alternatives) = self.alternatives {
            options = options.with_alternatives(alternatives);
        }
        if let Some(vehicle) = self.vehicle {
            options = options.with_vehicle_type(vehicle);
        }
        if let Some(time_delta) = self.time_delta {
            options = options.with_time_delta(time_delta);
        }
        if self.avoid_tolls {
            options = options.avoiding_toll_roads();
        }
        if self.avoid_ferries {
            options = options.avoiding_ferries();
        }
        if self.avoid_subscription_roads {
            options = options.avoiding_subscription_roads();
        }
        options
    }

    const fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            real_time: !self.typical_time,
            stop_at_bounds: self.stop_at_bounds,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, mut config: WazeConfig) -> WazeConfig {
        if let Some(region) = self.region {
            config = config.with_region(region);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn print_routes(routes: &[RouteResult]) {
    for (index, route) in routes.iter().enumerate() {
        println!("{}. {route}", index + 1);
        if !route.street_names.is_empty() {
            println!("   via {}", route.street_names.join(", "));
        }
    }
}

fn print_coordinate(location: &str, coordinate: &Coordinate) {
    println!("📍 {location}");
    println!("   {coordinate}");
    if let Some(bounds) = coordinate.bounds {
        println!(
            "   bounds: top {} bottom {} left {} right {}",
            bounds.top(),
            bounds.bottom(),
            bounds.left(),
            bounds.right()
        );
    }
}

/// Error out when the Waze search endpoint does not answer
async fn check_reachable(
    calculator: &WazeRouteCalculator,
    config: &WazeConfig,
) -> anyhow::Result<()> {
    if !calculator.is_healthy().await {
        anyhow::bail!("Waze unreachable at {}", config.base_url);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.apply_overrides(settings::load(cli.config.as_deref())?);
    debug!(region = %config.region, base_url = %config.base_url, "Configuration loaded");

    let calculator = WazeRouteCalculator::new(&config)?;

    match &cli.command {
        Commands::Route(args) => {
            let options = args.route_options(config.route_options);
            let routes = calculator
                .calc_routes(&args.from, &args.to, &options, args.aggregate_options())
                .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                println!("🚗 {} → {}", args.from, args.to);
                print_routes(&routes);
            }
        },

        Commands::Geocode { location } => {
            let coordinate = calculator.ensure_coords(location).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&coordinate)?);
            } else {
                print_coordinate(location, &coordinate);
            }
        },

        Commands::Check => {
            check_reachable(&calculator, &config).await?;
            println!("✅ Waze reachable ({})", config.region);
        },
    }

    calculator.close();
    Ok(())
}
