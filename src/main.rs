//! Command-line host for the order-split optimizer.

use clap::{Parser, ValueEnum};
use log::{info, warn};
use order_split::config::Config;
use order_split::distance::{DistanceService, LocationTable, UnavailableDistance};
use order_split::order::{DuplicatePolicy, Order};
use order_split::utils::{format_ranking, save_assignments};
use order_split::vendor::Vendor;
use order_split::FulfillmentOptimizer;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Duplicates {
    Reject,
    Sum,
    KeepFirst,
}

impl From<Duplicates> for DuplicatePolicy {
    fn from(value: Duplicates) -> Self {
        match value {
            Duplicates::Reject => DuplicatePolicy::Reject,
            Duplicates::Sum => DuplicatePolicy::SumQuantities,
            Duplicates::KeepFirst => DuplicatePolicy::KeepFirst,
        }
    }
}

/// Split orders across vendors at minimum total cost.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with one order or a list of orders
    #[arg(long)]
    orders: PathBuf,

    /// JSON file with the vendor inventory snapshots
    #[arg(long)]
    vendors: PathBuf,

    /// JSON table of location coordinates; without it shipping is estimated
    #[arg(long)]
    locations: Option<PathBuf>,

    /// JSON file with a full optimizer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of distinct items per order
    #[arg(long)]
    max_items: Option<usize>,

    /// Shipping price per meter
    #[arg(long)]
    rate: Option<f64>,

    /// Timeout for each distance lookup, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// How to treat a drug listed more than once on an order
    #[arg(long, value_enum, default_value_t = Duplicates::KeepFirst)]
    duplicates: Duplicates,

    /// Print the per-drug vendor ranking for each order
    #[arg(long)]
    ranking: bool,

    /// Write the assignments to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => Config::new(),
    };

    if let Some(max) = args.max_items {
        config = config.with_max_order_items(max);
    }
    if let Some(rate) = args.rate {
        config = config.with_shipping_rate_per_meter(rate);
    }
    if let Some(millis) = args.timeout_ms {
        config = config.with_distance_timeout(Duration::from_millis(millis));
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let distance: Arc<dyn DistanceService> = match &args.locations {
        Some(path) => {
            let table = LocationTable::from_file(path)?;
            info!("loaded {} locations from {}", table.len(), path.display());
            Arc::new(table)
        }
        None => {
            warn!("no location table given; all shipping costs are estimates");
            Arc::new(UnavailableDistance)
        }
    };

    let vendors = Vendor::load_all(&args.vendors)?;
    let orders = Order::load_all(&args.orders)?;
    info!("loaded {} vendors and {} orders", vendors.len(), orders.len());

    let optimizer = FulfillmentOptimizer::new(config, distance);
    let mut assignments = Vec::with_capacity(orders.len());

    for order in orders {
        let number = order.order_number;
        let plan = match order.merge_duplicates(args.duplicates.into()) {
            Ok(order) => optimizer.plan(&order, &vendors).await,
            Err(err) => Err(err),
        };

        match plan {
            Ok(plan) => {
                if args.ranking {
                    println!("Ranking for order {}:", number);
                    print!("{}", format_ranking(&plan.ranking));
                    println!("{}", plan.statistics.format());
                }
                assignments.push(plan.assignment);
            }
            Err(err) => warn!("order {} rejected: {}", number, err),
        }
    }

    match &args.output {
        Some(path) => {
            save_assignments(&assignments, path)?;
            info!("saved {} assignments to {}", assignments.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&assignments)?),
    }

    Ok(())
}
