//! Pulsim - Pulse Network Simulator
//!
//! Reads a module-definition file, runs the fixed-press pulse-tally
//! query, and attempts the structural sink-activation analysis.
//!
//! # Usage
//!
//! ```bash
//! pulsim modules.txt --presses 1000
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::info;
use pulsim::{
    analyzer, dsl,
    error::Result,
    network::{validate_network, Network},
    sim, DEFAULT_PRESS_COUNT,
};

/// Pulse network simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the module-definition file
    #[arg(value_name = "MODULE_FILE")]
    module_file: PathBuf,

    /// Number of button presses for the pulse-tally query
    #[arg(short, long, default_value_t = DEFAULT_PRESS_COUNT)]
    presses: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Parse the definition file and build the network
    let ast = dsl::parse_file(&args.module_file)?;
    let network = Network::from_ast(ast)?;
    validate_network(&network)?;
    info!("loaded network of {} modules", network.len());

    // Fixed-press pulse tally
    let tallies = sim::simulate_fixed_presses(network.clone(), args.presses)?;
    match tallies.product() {
        Some(product) => println!(
            "{} presses: {} low x {} high = {}",
            args.presses, tallies.low, tallies.high, product
        ),
        None => println!(
            "{} presses: {} low x {} high (product overflows u64)",
            args.presses, tallies.low, tallies.high
        ),
    }

    // Structural sink-activation analysis
    match analyzer::find_sink_activation_press_count(&network)? {
        Some(count) => println!("sink first receives a low pulse at press {count}"),
        None => println!("network does not decompose into counter branches"),
    }

    Ok(())
}
