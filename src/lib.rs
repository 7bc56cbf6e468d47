//! # Pulsim
//!
//! A discrete-event pulse-propagation simulator over networks of typed
//! logic modules, plus a structural cycle analyzer that proves when the
//! network's sink first receives a low pulse without simulating.
//!
//! This library provides:
//! - A line-oriented format for describing module networks
//! - A finalized module graph with flip-flop, conjunction, broadcast,
//!   receiver, and button modules wired by index
//! - A FIFO pulse kernel with cumulative low/high tallies
//! - A counter-branch analyzer recombining branch periods by LCM
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the module-definition format
//! - [`network`] - Module graph representation and validation
//! - [`sim`] - Pulse-propagation simulator
//! - [`analyzer`] - Structural cycle analysis
//!
//! Dependency order is `network` → `sim` and, independently, `network` →
//! `analyzer`: the analyzer reads topology only and never shares a
//! network instance with a running simulation (it borrows immutably).
//!
//! ## Usage
//!
//! ```
//! use pulsim::{analyzer, dsl, sim, Network};
//!
//! let text = "broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a";
//! let network = Network::from_ast(dsl::parse(text)?)?;
//!
//! let tallies = sim::simulate_fixed_presses(network.clone(), 1000)?;
//! assert_eq!(tallies.product(), Some(32_000_000));
//!
//! // No sink in this network, so the cycle query is not applicable.
//! assert_eq!(analyzer::find_sink_activation_press_count(&network)?, None);
//! # Ok::<(), pulsim::PulsimError>(())
//! ```

pub mod analyzer;
pub mod dsl;
pub mod error;
pub mod network;
pub mod sim;

// Re-export main types for convenience
pub use error::{PulsimError, Result};
pub use network::{Level, Module, ModuleId, ModuleKind, Network, NetworkBuilder, Pulse};
pub use sim::{PulseTallies, Simulator, DEFAULT_PRESS_COUNT};

/// Name of the broadcaster module every network must define.
pub const BROADCASTER_NAME: &str = "broadcaster";

/// Name of the synthetic button module; reserved, created at finalization.
pub const BUTTON_NAME: &str = "button";

/// Names a destination may carry without a definition, becoming the
/// network's sink. Discovering more than one sink is a fatal ambiguity.
pub const ACCEPTED_SINK_NAMES: [&str; 2] = ["rx", "output"];
