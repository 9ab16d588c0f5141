//! queuesim CLI: simulate M/M/1 queues behind a probabilistic load balancer.

use clap::{Parser, Subcommand};
use queuesim_core::config::{SimConfig, POSITIONAL_USAGE};
use queuesim_core::metrics::{self, SimulationReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "queuesim",
    about = "Simulate M/M/1 queues behind a probabilistic load balancer",
    version
)]
struct Cli {
    /// Log engine progress at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run from positional parameters: T M P_1..P_M λ Q_1..Q_M μ_1..μ_M.
    Run {
        /// Simulation parameters.
        #[arg(required = true, num_args = 2..)]
        params: Vec<String>,
        /// Random seed for a reproducible run.
        #[arg(short, long)]
        seed: Option<u64>,
        /// Routing policy name.
        #[arg(short, long, default_value = "weighted_random")]
        routing: String,
        /// Print a formatted table instead of the summary line.
        #[arg(long)]
        table: bool,
        /// Write the full report as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a simulation described by a TOML file.
    Config {
        /// Path to TOML configuration file.
        #[arg(short, long)]
        config: PathBuf,
        /// Write the full report as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Single-queue run compared against closed-form M/M/1 predictions.
    Mm1 {
        /// Arrival rate (λ).
        #[arg(long, default_value = "1.0")]
        arrival_rate: f64,
        /// Service rate (μ).
        #[arg(long, default_value = "2.0")]
        service_rate: f64,
        /// Time after which no new arrivals are generated.
        #[arg(long, default_value = "50000")]
        horizon: f64,
        /// Waiting-room size.
        #[arg(long, default_value = "1000")]
        capacity: usize,
        /// Random seed for a reproducible run.
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run one config under several routing policies.
    Compare {
        /// Path to TOML configuration file.
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated list of policy names.
        #[arg(short, long, value_delimiter = ',')]
        policies: Vec<String>,
        /// Write the reports as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available routing policies.
    ListPolicies,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            params,
            seed,
            routing,
            table,
            output,
        } => {
            let config = SimConfig::from_positional(params.as_slice())
                .map(|c| c.with_seed(seed).with_routing(routing))
                .and_then(|c| c.validate().map(|_| c))
                .unwrap_or_else(|e| {
                    eprintln!("Input error: {}", e);
                    eprintln!("Usage: queuesim run {}", POSITIONAL_USAGE);
                    std::process::exit(1);
                });

            let report = run_or_exit(&config);
            if table {
                print!("{}", metrics::format_table(&report));
            } else {
                println!("{}", report.summary);
            }
            if let Some(path) = output {
                write_json(&path, &report);
            }
        }
        Commands::Config { config, output } => {
            let config = load_config(&config);
            let report = run_or_exit(&config);
            print!("{}", metrics::format_table(&report));
            if let Some(path) = output {
                write_json(&path, &report);
            }
        }
        Commands::Mm1 {
            arrival_rate,
            service_rate,
            horizon,
            capacity,
            seed,
        } => {
            let config =
                SimConfig::single_queue(horizon, arrival_rate, capacity, service_rate, seed)
                    .unwrap_or_else(|e| {
                        eprintln!("Input error: {}", e);
                        std::process::exit(1);
                    });
            let report = queuesim_core::run_mm1(&config).unwrap_or_else(|e| {
                eprintln!("Simulation failed: {}", e);
                std::process::exit(2);
            });
            print!("{}", metrics::format_mm1(&report));
        }
        Commands::Compare {
            config,
            policies,
            output,
        } => {
            let config = load_config(&config);
            let available = queuesim_routing::available_policies();
            let names: Vec<&str> = if policies.is_empty() {
                available
            } else {
                policies.iter().map(|s| s.as_str()).collect()
            };

            let reports = queuesim_core::compare_policies(&config, &names).unwrap_or_else(|e| {
                eprintln!("Simulation failed: {}", e);
                std::process::exit(2);
            });
            for report in &reports {
                println!("{:<16} {}", report.policy, report.summary);
            }
            if let Some(path) = output {
                write_json(&path, &reports);
            }
        }
        Commands::ListPolicies => {
            println!("Available routing policies:");
            for name in queuesim_routing::available_policies() {
                println!("  - {}", name);
            }
        }
    }
}

fn load_config(path: &Path) -> SimConfig {
    SimConfig::from_file(path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    })
}

fn run_or_exit(config: &SimConfig) -> SimulationReport {
    queuesim_core::run_simulation(config).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(2);
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing results: {}", e);
        std::process::exit(1);
    });
    std::fs::write(path, json).unwrap_or_else(|e| {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    });
    println!("Results written to {}", path.display());
}
