//! qdag Command-Line Interface
//!
//! The main entry point for the `qdag` tool: inspect, check, convert and
//! optimize circuit descriptions stored as JSON or YAML.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::demo::DemoCircuit;
use commands::{check, convert, demo, optimize, stats, version};

/// qdag - columnar DAG engine for quantum circuits
#[derive(Parser)]
#[command(name = "qdag")]
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
    /// Print circuit statistics
    Stats {
        /// Input file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the optimization pipeline on a circuit
    Optimize {
        /// Input file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Output file (defaults to <input>_optimized.<ext>)
        #[arg(short, long)]
        output: Option<String>,

        /// Optimization level (0-3)
        #[arg(long, default_value = "1")]
        optimization_level: u8,
    },

    /// Run the full integrity check on a circuit
    Check {
        /// Input file (JSON or YAML)
        #[arg(short, long)]
        input: String,
    },

    /// Convert between JSON and YAML descriptions
    Convert {
        /// Input file
        #[arg(short, long)]
        input: String,

        /// Output file
        #[arg(short, long)]
        output: String,
    },

    /// Generate a built-in circuit
    Demo {
        /// Circuit to generate
        #[arg(value_enum)]
        circuit: DemoCircuit,

        /// Number of qubits (ghz, qft)
        #[arg(short, long, default_value = "3")]
        num_qubits: usize,

        /// Output file (YAML to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
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
        Commands::Stats { input, json } => stats::execute(&input, json),

        Commands::Optimize {
            input,
            output,
            optimization_level,
        } => optimize::execute(&input, output.as_deref(), optimization_level),

        Commands::Check { input } => check::execute(&input),

        Commands::Convert { input, output } => convert::execute(&input, &output),

        Commands::Demo {
            circuit,
            num_qubits,
            output,
        } => demo::execute(circuit, num_qubits, output.as_deref()),

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

    Ok(())
}
