//! Core types for the module network.

use std::fmt;

/// A unique identifier for a module in the network.
///
/// Modules live in an arena owned by the network; every cross-reference
/// between modules is one of these indices, never an owning pointer, so
/// cyclic wiring (a conjunction feeding back toward the broadcaster's
/// descendants) needs no special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// The level of a pulse: low or high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check if this is a high pulse.
    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if this is a low pulse.
    pub fn is_low(&self) -> bool {
        matches!(self, Level::Low)
    }

    /// Index into per-level tables (low = 0, high = 1).
    pub fn index(&self) -> usize {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::High => write!(f, "high"),
        }
    }
}

/// An immutable pulse message travelling along a wire.
///
/// Pulses are plain values; they exist only while queued and are never
/// owned by a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// The module that sent the pulse
    pub source: ModuleId,
    /// The module that will receive the pulse
    pub target: ModuleId,
    /// The boolean level carried
    pub level: Level,
}

impl Pulse {
    /// Create a new pulse.
    pub fn new(source: ModuleId, target: ModuleId, level: Level) -> Self {
        Self {
            source,
            target,
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_predicates_are_complementary() {
        assert!(Level::Low.is_low());
        assert!(!Level::Low.is_high());
        assert!(Level::High.is_high());
        assert!(!Level::High.is_low());
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.level, self.target)
    }
}
