//! Parser for the plain-text module-definition format.
//!
//! The format is line-oriented: one module per line, a kind symbol, a
//! name, an arrow, and a comma-separated destination list.
//!
//! # Grammar Overview
//!
//! ```text
//! network     = { line }
//! line        = comment | module | empty
//! comment     = '#' { any_char }
//! module      = [symbol] name " -> " [destinations]
//! destinations = name { ", " name }
//!
//! symbol      = '%' | '&'
//! name        = (letter | digit | '_')+
//! ```
//!
//! # Kind Symbols
//!
//! | Symbol | Kind |
//! |--------|------|
//! | (none) | Broadcaster (`broadcaster`) or a designated sink |
//! | `%` | Flip-flop |
//! | `&` | Conjunction |
//!
//! Destination names that never appear on the left of an arrow become
//! receiver modules if they are accepted sink names, and are rejected as
//! dangling references otherwise.
//!
//! # Example
//!
//! ```text
//! broadcaster -> a, b, c
//! %a -> b
//! %b -> c
//! %c -> inv
//! &inv -> a
//! ```

mod ast;
mod parser;

pub use ast::{KindSymbol, ModuleDef, NetworkAst};
pub use parser::parse;

/// Parse a module-definition file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> crate::error::Result<NetworkAst> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::PulsimError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    parse(&content)
}
