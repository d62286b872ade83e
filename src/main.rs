//! Fuel-Scout main entry point
//!
//! This is the command-line interface for the Fuel-Scout price scraper.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fuel_scout::config::{load_config_with_hash, Config};
use fuel_scout::estimate::{estimate_and_record, EstimateRequest};
use fuel_scout::output::{
    load_dashboard, load_price_board, load_run_summary, load_vehicle_catalogue, print_dashboard,
    print_estimate, print_estimate_history, print_price_board, print_run_summary,
    print_scrape_logs, print_scrape_report, print_vehicle_catalogue,
};
use fuel_scout::storage::{open_storage, SqliteStorage, Storage};
use fuel_scout::{classify, run_scrape, FuelError, FuelType, Orchestrator};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fuel-Scout: a fuel price scraper and trip cost estimator
///
/// Scrapes current fuel prices from Pertamina, Shell and BP through a
/// headless browser and stores them in SQLite. Meant to be run once per
/// invocation from cron or a similar scheduler.
#[derive(Parser, Debug)]
#[command(name = "fuel-scout")]
#[command(version = "1.0.0")]
#[command(about = "Fuel price scraper and trip cost estimator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every provider once and save the prices (default)
    Scrape {
        /// Validate config and show what would be scraped without launching a browser
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored providers and their prices
    Prices,

    /// Show scrape log entries
    Logs {
        /// Number of most recent entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Show one run and its entries instead
        #[arg(long, value_name = "ID")]
        run: Option<i64>,
    },

    /// Manage fuel providers
    Provider {
        #[command(subcommand)]
        action: ProviderCommand,
    },

    /// Manage fuel prices
    Price {
        #[command(subcommand)]
        action: PriceCommand,
    },

    /// Manage vehicle categories and types
    Vehicle {
        #[command(subcommand)]
        action: VehicleCommand,
    },

    /// List vehicle categories and their types
    Vehicles,

    /// Estimate the fuel cost of a trip using a stored price
    Estimate {
        /// ID of the price to use (see `prices`)
        #[arg(long)]
        price_id: i64,

        /// Trip distance in kilometers
        #[arg(long)]
        distance_km: f64,

        /// Vehicle category supplying the default consumption (see `vehicles`)
        #[arg(long, value_name = "ID", required_unless_present = "km_per_liter")]
        category: Option<i64>,

        /// Vehicle type in that category, overriding its consumption
        #[arg(long, value_name = "ID", requires = "category")]
        vehicle_type: Option<i64>,

        /// Vehicle consumption in kilometers per liter, overriding the catalogue
        #[arg(long)]
        km_per_liter: Option<f64>,

        /// Starting point label saved with the estimate
        #[arg(long)]
        from: Option<String>,

        /// Destination label saved with the estimate
        #[arg(long)]
        to: Option<String>,
    },

    /// Show past estimates, newest first
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show catalogue counts and the latest estimates
    Stats,
}

#[derive(Subcommand, Debug)]
enum VehicleCommand {
    /// Manage vehicle categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Manage vehicle types
    Type {
        #[command(subcommand)]
        action: VehicleTypeCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add a category, e.g. "Motor" at 40 km/l
    Add {
        name: String,

        /// Default consumption in kilometers per liter
        #[arg(long)]
        default_kml: f64,
    },

    /// Change a category's name or default consumption
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        default_kml: Option<f64>,
    },

    /// Remove a category and its vehicle types
    Remove { id: i64 },
}

#[derive(Subcommand, Debug)]
enum VehicleTypeCommand {
    /// Add a vehicle type to a category
    Add {
        #[arg(long)]
        category_id: i64,

        name: String,

        #[arg(long)]
        km_per_liter: f64,
    },

    /// Change a vehicle type's name or consumption
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        km_per_liter: Option<f64>,
    },

    /// Remove a vehicle type
    Remove { id: i64 },
}

#[derive(Subcommand, Debug)]
enum ProviderCommand {
    /// Add a provider
    Add { name: String },

    /// Rename a provider
    Rename { id: i64, name: String },

    /// Remove a provider and all its prices
    Remove { id: i64 },
}

#[derive(Subcommand, Debug)]
enum PriceCommand {
    /// Add a price to a provider
    Add {
        #[arg(long)]
        provider_id: i64,

        /// Product name, e.g. "Pertamax Turbo"
        #[arg(long)]
        name: String,

        /// Fuel grade (RON90, RON92, RON95, RON98, Diesel); derived from the name if omitted
        #[arg(long)]
        fuel_type: Option<FuelType>,

        /// Price per liter
        #[arg(long)]
        price: i64,
    },

    /// Change a price's name, grade or value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        fuel_type: Option<FuelType>,

        #[arg(long)]
        price: Option<i64>,
    },

    /// Remove a price
    Remove { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    match cli.command.unwrap_or(Command::Scrape { dry_run: false }) {
        Command::Scrape { dry_run: true } => handle_dry_run(&config, &config_hash),
        Command::Scrape { dry_run: false } => handle_scrape(&config, &config_hash).await?,
        Command::Prices => handle_prices(&config)?,
        Command::Logs { limit, run } => handle_logs(&config, limit, run)?,
        Command::Provider { action } => handle_provider(&config, action)?,
        Command::Price { action } => handle_price(&config, action)?,
        Command::Vehicle { action } => handle_vehicle(&config, action)?,
        Command::Vehicles => handle_vehicles(&config)?,
        Command::Estimate {
            price_id,
            distance_km,
            category,
            vehicle_type,
            km_per_liter,
            from,
            to,
        } => {
            let request = EstimateRequest {
                price_id,
                distance_km,
                category_id: category,
                vehicle_type_id: vehicle_type,
                km_per_liter,
                start_name: from,
                end_name: to,
            };
            handle_estimate(&config, &request)?
        }
        Command::History { limit } => handle_history(&config, limit)?,
        Command::Stats => handle_stats(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fuel_scout=info,warn"),
            1 => EnvFilter::new("fuel_scout=debug,info"),
            2 => EnvFilter::new("fuel_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_database(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    open_storage(path).with_context(|| format!("failed to open database {}", path.display()))
}

/// Handles `scrape --dry-run`: shows what a scrape would do
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Fuel-Scout Dry Run ===\n");

    println!("Scraper:");
    println!("  Region: {}", config.scraper.region);
    println!("  Content timeout: {}s", config.scraper.content_timeout_secs);
    println!("  Consent timeout: {}s", config.scraper.consent_timeout_secs);
    println!("  Settle delay: {}ms", config.scraper.settle_delay_ms);

    println!("\nBrowser:");
    match &config.browser.remote_url {
        Some(url) => println!("  Remote: {}", url),
        None => println!("  Headless: {}", config.browser.headless),
    }
    println!(
        "  Navigation timeout: {}s",
        config.browser.navigation_timeout_secs
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let orchestrator = Orchestrator::from_config(config, config_hash);
    let urls = [
        &config.sources.pertamina_url,
        &config.sources.shell_url,
        &config.sources.bp_url,
    ];
    println!("\nProviders (in order):");
    for (provider, url) in orchestrator.providers().iter().zip(urls) {
        println!("  - {}: {}", provider, url);
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!("Scraping fuel prices for {}", config.scraper.region);

    let report = run_scrape(config, config_hash)
        .await
        .context("scrape run aborted")?;

    print_scrape_report(&report);

    if report.failed() > 0 {
        tracing::warn!("{} provider(s) failed, see `logs`", report.failed());
    }

    Ok(())
}

fn handle_prices(config: &Config) -> anyhow::Result<()> {
    let storage = open_database(config)?;
    let board = load_price_board(&storage)?;
    print_price_board(&board);
    Ok(())
}

fn handle_logs(config: &Config, limit: usize, run: Option<i64>) -> anyhow::Result<()> {
    let storage = open_database(config)?;

    match run {
        Some(run_id) => {
            let summary = load_run_summary(&storage, Some(run_id))?
                .ok_or_else(|| FuelError::NotFound(format!("scrape run {}", run_id)))?;
            print_run_summary(&summary);
        }
        None => {
            let logs = storage.recent_scrape_logs(limit)?;
            print_scrape_logs(&logs);
        }
    }

    Ok(())
}

fn handle_provider(config: &Config, action: ProviderCommand) -> anyhow::Result<()> {
    let mut storage = open_database(config)?;

    match action {
        ProviderCommand::Add { name } => {
            let name = required_name(&name)?;
            let provider = storage.create_provider(name)?;
            println!("✓ Added provider #{} {}", provider.id, provider.name);
        }
        ProviderCommand::Rename { id, name } => {
            let name = required_name(&name)?;
            storage.rename_provider(id, name)?;
            println!("✓ Renamed provider #{} to {}", id, name);
        }
        ProviderCommand::Remove { id } => {
            storage.delete_provider(id)?;
            println!("✓ Removed provider #{} and its prices", id);
        }
    }

    Ok(())
}

fn handle_price(config: &Config, action: PriceCommand) -> anyhow::Result<()> {
    let mut storage = open_database(config)?;

    match action {
        PriceCommand::Add {
            provider_id,
            name,
            fuel_type,
            price,
        } => {
            let name = required_name(&name)?;
            let price = required_price(price)?;
            let fuel_type = fuel_type.unwrap_or_else(|| classify(name));

            let id = storage.create_price(provider_id, name, fuel_type, price)?;
            println!("✓ Added price #{}: {} ({}) {}", id, name, fuel_type, price);
        }
        PriceCommand::Update {
            id,
            name,
            fuel_type,
            price,
        } => {
            let current = storage
                .get_price(id)?
                .ok_or_else(|| FuelError::NotFound(format!("price {}", id)))?;

            let name = match &name {
                Some(name) => required_name(name)?.to_string(),
                None => current.fuel_name,
            };
            let fuel_type = fuel_type.unwrap_or(current.fuel_type);
            let price = match price {
                Some(price) => required_price(price)?,
                None => current.price,
            };

            storage.update_price(id, &name, fuel_type, price)?;
            println!("✓ Updated price #{}: {} ({}) {}", id, name, fuel_type, price);
        }
        PriceCommand::Remove { id } => {
            storage.delete_price(id)?;
            println!("✓ Removed price #{}", id);
        }
    }

    Ok(())
}

fn handle_vehicle(config: &Config, action: VehicleCommand) -> anyhow::Result<()> {
    let mut storage = open_database(config)?;

    match action {
        VehicleCommand::Category { action } => match action {
            CategoryCommand::Add { name, default_kml } => {
                let name = required_name(&name)?;
                let category = storage.create_vehicle_category(name, default_kml)?;
                println!(
                    "✓ Added category #{} {} ({} km/l)",
                    category.id, category.name, category.default_kml
                );
            }
            CategoryCommand::Update {
                id,
                name,
                default_kml,
            } => {
                let current = storage
                    .get_vehicle_category(id)?
                    .ok_or_else(|| FuelError::NotFound(format!("vehicle category {}", id)))?;

                let name = match &name {
                    Some(name) => required_name(name)?.to_string(),
                    None => current.name,
                };
                let default_kml = default_kml.unwrap_or(current.default_kml);

                storage.update_vehicle_category(id, &name, default_kml)?;
                println!("✓ Updated category #{}: {} ({} km/l)", id, name, default_kml);
            }
            CategoryCommand::Remove { id } => {
                storage.delete_vehicle_category(id)?;
                println!("✓ Removed category #{} and its vehicle types", id);
            }
        },
        VehicleCommand::Type { action } => match action {
            VehicleTypeCommand::Add {
                category_id,
                name,
                km_per_liter,
            } => {
                let name = required_name(&name)?;
                let id = storage.create_vehicle_type(category_id, name, km_per_liter)?;
                println!("✓ Added vehicle type #{} {} ({} km/l)", id, name, km_per_liter);
            }
            VehicleTypeCommand::Update {
                id,
                name,
                km_per_liter,
            } => {
                let current = storage
                    .get_vehicle_type(id)?
                    .ok_or_else(|| FuelError::NotFound(format!("vehicle type {}", id)))?;

                let name = match &name {
                    Some(name) => required_name(name)?.to_string(),
                    None => current.name,
                };
                let km_per_liter = km_per_liter.unwrap_or(current.km_per_liter);

                storage.update_vehicle_type(id, &name, km_per_liter)?;
                println!("✓ Updated vehicle type #{}: {} ({} km/l)", id, name, km_per_liter);
            }
            VehicleTypeCommand::Remove { id } => {
                storage.delete_vehicle_type(id)?;
                println!("✓ Removed vehicle type #{}", id);
            }
        },
    }

    Ok(())
}

fn handle_vehicles(config: &Config) -> anyhow::Result<()> {
    let storage = open_database(config)?;
    let catalogue = load_vehicle_catalogue(&storage)?;
    print_vehicle_catalogue(&catalogue);
    Ok(())
}

fn handle_estimate(config: &Config, request: &EstimateRequest) -> anyhow::Result<()> {
    let mut storage = open_database(config)?;

    let outcome = estimate_and_record(&mut storage, request)?;
    print_estimate(&outcome);

    Ok(())
}

fn handle_history(config: &Config, limit: usize) -> anyhow::Result<()> {
    let storage = open_database(config)?;
    let estimates = storage.recent_estimates(limit)?;
    print_estimate_history(&estimates);
    Ok(())
}

fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_database(config)?;
    let dashboard = load_dashboard(&storage)?;
    print_dashboard(&dashboard);
    Ok(())
}

fn required_name(name: &str) -> anyhow::Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        bail!("name must not be empty");
    }
    Ok(name)
}

fn required_price(price: i64) -> anyhow::Result<i64> {
    if price < 0 {
        bail!("price must not be negative, got {}", price);
    }
    Ok(price)
}
