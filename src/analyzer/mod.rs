//! Structural cycle analysis.
//!
//! Answers the sink-activation query without simulating, by matching the
//! network against the binary-counter family and combining branch
//! periods by least common multiple.

mod cycle;

pub use cycle::find_sink_activation_press_count;
