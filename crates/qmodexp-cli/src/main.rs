//! qmodexp Command-Line Interface
//!
//! Runs the modular-exponentiation stage of Shor's algorithm on the
//! statevector simulator and verifies every exponent branch classically.
//!
//! ```text
//! qmodexp run --base 7 --modulus 15 --qubits 4
//! qmodexp run -i input.txt --show-states --export report.json
//! qmodexp check --base 6 --modulus 15
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check, run, version};

/// qmodexp - statevector simulation of modular exponentiation
#[derive(Parser)]
#[command(name = "qmodexp")]
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
    /// Simulate base^x mod N over every exponent and verify the result
    Run {
        /// Configuration file (`base modulus qubits` text, JSON or YAML)
        #[arg(short, long)]
        input: Option<String>,

        /// Base (overrides the file)
        #[arg(short, long)]
        base: Option<u64>,

        /// Modulus (overrides the file)
        #[arg(short, long)]
        modulus: Option<u64>,

        /// Exponent register width (overrides the file)
        #[arg(short, long)]
        qubits: Option<usize>,

        /// Write the verification report as JSON
        #[arg(short, long)]
        export: Option<String>,

        /// List every basis state with probability above 0.001
        #[arg(long)]
        show_states: bool,
    },

    /// Check that base and modulus are coprime
    Check {
        /// Base
        #[arg(short, long)]
        base: u64,

        /// Modulus
        #[arg(short, long)]
        modulus: u64,
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
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            base,
            modulus,
            qubits,
            export,
            show_states,
        } => run::execute(
            input.as_deref(),
            run::Overrides {
                base,
                modulus,
                qubits,
            },
            export.as_deref(),
            show_states,
        ),

        Commands::Check { base, modulus } => check::execute(base, modulus),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
