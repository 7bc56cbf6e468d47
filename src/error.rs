//! Error types for the Pulsim module-network simulator.
//!
//! This module provides a unified error type [`PulsimError`] that covers
//! all error conditions that can occur during definition parsing, network
//! construction, simulation, and cycle analysis.

use thiserror::Error;

/// Result type alias using [`PulsimError`].
pub type Result<T> = std::result::Result<T, PulsimError>;

/// Unified error type for all Pulsim operations.
#[derive(Error, Debug)]
pub enum PulsimError {
    // ============ Parse Errors ============
    /// Malformed module-definition line
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    // ============ Network Construction Errors ============
    /// Two definition lines share one module name
    #[error("Duplicate module name '{name}'")]
    DuplicateModule { name: String },

    /// A destination name is never defined and is not an accepted sink name
    // Field is `origin`, not `source`: thiserror reserves `source` for a
    // chained error cause.
    #[error("Module '{origin}' outputs to undefined module '{target}'")]
    DanglingReference { origin: String, target: String },

    /// No broadcaster module was defined
    #[error("Network has no broadcaster module")]
    MissingBroadcaster,

    /// More than one sink candidate was discovered
    #[error("Multiple candidate sink modules: {names:?}")]
    MultipleSinks { names: Vec<String> },

    /// Some module lists the synthetic button as a destination
    #[error("Module '{origin}' routes pulses into the button")]
    ButtonAsDestination { origin: String },

    /// A definition uses a name reserved for the synthetic button
    #[error("Module name '{name}' at line {line} is reserved")]
    ReservedName { name: String, line: usize },

    /// A sink module was defined with a destination list
    #[error("Sink module '{name}' must not have outputs")]
    SinkWithOutputs { name: String },

    /// Invalid network topology
    #[error("Invalid network topology: {message}")]
    InvalidTopology { message: String },

    // ============ Simulation / Analysis Errors ============
    /// Pulse tallies or their product exceeded u64
    #[error("Pulse tally overflow after {presses} presses")]
    TallyOverflow { presses: u64 },

    /// Branch period reconstruction or LCM combination exceeded u64,
    /// meaning the counter model does not fit this input
    #[error("Arithmetic overflow during cycle analysis: {message}")]
    PeriodOverflow { message: String },

    // ============ I/O Errors ============
    /// Error reading a module-definition file
    #[error("Failed to read module file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PulsimError {
    /// Create a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Create a period overflow error.
    pub fn period_overflow(message: impl Into<String>) -> Self {
        Self::PeriodOverflow {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_dangling_reference_display_and_no_cause() {
        let err = PulsimError::DanglingReference {
            origin: "a".to_string(),
            target: "ghost".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Module 'a' outputs to undefined module 'ghost'"
        );
        // Only FileReadError carries a chained cause.
        assert!(err.source().is_none());
    }

    #[test]
    fn test_button_as_destination_has_no_cause() {
        let err = PulsimError::ButtonAsDestination {
            origin: "a".to_string(),
        };
        assert!(err.source().is_none());
    }
}
