//! Module graph representation.
//!
//! This module provides the in-memory form of a pulse network after
//! parsing: typed modules in an arena, wired by id, built once through
//! [`NetworkBuilder`] and frozen into a [`Network`].

mod graph;
mod module;
mod types;
mod validate;

pub use graph::{Network, NetworkBuilder};
pub use module::{ConjunctionState, FlipFlopState, Module, ModuleKind};
pub use types::{Level, ModuleId, Pulse};
pub use validate::validate_network;
