//! Discrete-event pulse propagation.
//!
//! The kernel is a single FIFO queue drained to exhaustion per button
//! press: strict arrival order, breadth-first fan-out, no I/O in the
//! loop. All state lives in the network's modules and persists across
//! presses.

mod simulator;

pub use simulator::{simulate_fixed_presses, PulseTallies, Simulator};

/// Press count for the fixed-press pulse-tally query.
pub const DEFAULT_PRESS_COUNT: u64 = 1000;
