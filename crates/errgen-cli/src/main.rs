//! errgen Command-Line Interface
//!
//! Runs error-generator propagation jobs described in JSON or YAML files and
//! prints the resulting error-generator dictionaries as JSON.
//!
//! ```text
//! errgen propagate -i job.yaml --layerwise --bch-order 2
//! errgen validate -i job.json
//! errgen gates
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::propagate::ConfigOverrides;
use commands::{gates, propagate, validate, version};

/// errgen - sparse error-generator propagation for noisy Clifford circuits
#[derive(Parser)]
#[command(name = "errgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate a job's gate errors to the end of its circuit
    Propagate {
        /// Job file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Number of BCH orders (overrides the job)
        #[arg(long)]
        bch_order: Option<usize>,

        /// Combine layers pairwise with BCH
        #[arg(long)]
        layerwise: bool,

        /// Per-timestep output with cumulant corrections
        #[arg(long)]
        nonmarkovian: bool,

        /// Drop composed terms below this magnitude (overrides the job)
        #[arg(long)]
        threshold: Option<f64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a job file without propagating
    Validate {
        /// Job file (JSON or YAML)
        #[arg(short, long)]
        input: String,
    },

    /// List gate names and the Clifford gates they map to
    Gates {
        /// Include the aliases of this job file
        #[arg(short, long)]
        job: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Propagate {
            input,
            output,
            bch_order,
            layerwise,
            nonmarkovian,
            threshold,
            pretty,
        } => {
            let overrides = ConfigOverrides {
                bch_order,
                layerwise,
                nonmarkovian,
                truncation_threshold: threshold,
            };
            propagate::execute(&input, output.as_deref(), &overrides, pretty)
        }

        Commands::Validate { input } => validate::execute(&input),

        Commands::Gates { job } => gates::execute(job.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
