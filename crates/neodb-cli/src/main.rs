//! neodb - inspect NEOs and query their close approaches
//!
//! ```text
//! neodb inspect --pdes 433 --approaches
//! neodb query --start-date 2020-01-01 --hazardous --limit 5
//! neodb query --max-distance 0.05 --where 'diameter>=1' --outfile results.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use neodb_core::{create_filters, limit, AttributeFilter, FilterCriteria, NeoDatabase};
use tracing::debug;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "neodb")]
#[command(about = "Explore near-Earth objects and their close approaches")]
struct Cli {
    /// CSV file of near-Earth objects
    #[arg(long, env = "NEODB_NEOFILE", default_value = "data/neos.csv", global = true)]
    neofile: PathBuf,

    /// JSON file of close approaches
    #[arg(long, env = "NEODB_CADFILE", default_value = "data/cad.json", global = true)]
    cadfile: PathBuf,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one NEO by designation or name
    #[command(group(ArgGroup::new("key").required(true).args(["pdes", "name"])))]
    Inspect {
        /// Primary designation, e.g. 433
        #[arg(long)]
        pdes: Option<String>,

        /// IAU name, e.g. Eros
        #[arg(long)]
        name: Option<String>,

        /// Also list the NEO's close approaches
        #[arg(long)]
        approaches: bool,
    },
    /// Stream close approaches matching every given criterion
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Approaches on this date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    date: Option<NaiveDate>,

    /// Approaches on or after this date
    #[arg(long, short = 's')]
    start_date: Option<NaiveDate>,

    /// Approaches on or before this date
    #[arg(long, short = 'e')]
    end_date: Option<NaiveDate>,

    /// Minimum approach distance (au)
    #[arg(long)]
    min_distance: Option<f64>,

    /// Maximum approach distance (au)
    #[arg(long)]
    max_distance: Option<f64>,

    /// Minimum relative velocity (km/s)
    #[arg(long)]
    min_velocity: Option<f64>,

    /// Maximum relative velocity (km/s)
    #[arg(long)]
    max_velocity: Option<f64>,

    /// Minimum NEO diameter (km)
    #[arg(long)]
    min_diameter: Option<f64>,

    /// Maximum NEO diameter (km)
    #[arg(long)]
    max_diameter: Option<f64>,

    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    hazardous: bool,

    /// Only NEOs that are not potentially hazardous
    #[arg(long)]
    not_hazardous: bool,

    /// Extra criterion such as 'distance<=0.1' (repeatable)
    #[arg(long = "where", value_name = "EXPR")]
    filters: Vec<AttributeFilter>,

    /// Maximum number of results, 0 for no limit
    #[arg(long, short = 'l')]
    limit: Option<usize>,

    /// Write results to a .csv or .json file instead of printing them
    #[arg(long, short = 'o')]
    outfile: Option<PathBuf>,
}

impl QueryArgs {
    fn criteria(&self) -> FilterCriteria {
        let hazardous = match (self.hazardous, self.not_hazardous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        FilterCriteria {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.min_distance,
            distance_max: self.max_distance,
            velocity_min: self.min_velocity,
            velocity_max: self.max_velocity,
            diameter_min: self.min_diameter,
            diameter_max: self.max_diameter,
            hazardous,
        }
    }
}

/// Printed results default to this many rows
const DEFAULT_PRINT_LIMIT: usize = 10;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let db = neodb_io::load_database(&cli.neofile, &cli.cadfile).with_context(|| {
        format!(
            "failed to load {} and {}",
            cli.neofile.display(),
            cli.cadfile.display()
        )
    })?;

    match cli.command {
        Commands::Inspect {
            pdes,
            name,
            approaches,
        } => inspect(&db, pdes.as_deref(), name.as_deref(), approaches),
        Commands::Query(args) => query(&db, &args),
    }
}

fn inspect(db: &NeoDatabase, pdes: Option<&str>, name: Option<&str>, approaches: bool) -> Result<()> {
    let found = match pdes {
        Some(pdes) => db.get_neo_by_designation(pdes),
        None => db.get_neo_by_name(name),
    };

    let Some(neo) = found else {
        println!("No matching NEOs exist in the database.");
        return Ok(());
    };

    println!("{}", neo);
    if approaches {
        for approach in neo.approaches() {
            println!("- {}", approach);
        }
    }
    Ok(())
}

fn query(db: &NeoDatabase, args: &QueryArgs) -> Result<()> {
    let mut filters = create_filters(&args.criteria());
    filters.extend(args.filters.iter().copied());
    debug!(
        "Querying with {} filters: [{}]",
        filters.len(),
        filters.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    let results = db.query(&filters);

    match &args.outfile {
        Some(path) => {
            let written = neodb_io::write_results(limit(results, args.limit), path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} close approaches to {}", written, path.display());
        }
        None => {
            let bound = Some(args.limit.unwrap_or(DEFAULT_PRINT_LIMIT));
            for approach in limit(results, bound) {
                println!("{}", approach);
            }
        }
    }
    Ok(())
}
