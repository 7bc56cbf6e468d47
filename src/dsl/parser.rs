//! Parser for the module-definition grammar.

use super::ast::{KindSymbol, ModuleDef, NetworkAst};
use crate::error::{PulsimError, Result};

/// Separator between a module name and its destination list.
const ARROW: &str = " -> ";

/// Parse a complete definition text into an AST.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers are
/// 1-based and refer to the original text, comments included.
pub fn parse(input: &str) -> Result<NetworkAst> {
    let mut ast = NetworkAst::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        ast.modules.push(parse_module_line(trimmed, line)?);
    }

    Ok(ast)
}

/// Parse one `[symbol]name -> dest1, dest2, ...` line.
fn parse_module_line(text: &str, line: usize) -> Result<ModuleDef> {
    let (lhs, rhs) = text
        .split_once(ARROW)
        // A trimmed line may end in " ->": a sink with no destinations.
        .or_else(|| text.strip_suffix(" ->").map(|lhs| (lhs, "")))
        .ok_or_else(|| PulsimError::parse(line, format!("expected '{ARROW}' separator")))?;

    let lhs = lhs.trim();
    let (symbol, name) = if let Some(name) = lhs.strip_prefix('%') {
        (KindSymbol::FlipFlop, name)
    } else if let Some(name) = lhs.strip_prefix('&') {
        (KindSymbol::Conjunction, name)
    } else {
        (KindSymbol::Plain, lhs)
    };

    if name.is_empty() {
        return Err(PulsimError::parse(line, "missing module name"));
    }
    if !is_valid_name(name) {
        return Err(PulsimError::parse(
            line,
            format!("invalid module name '{name}'"),
        ));
    }

    let mut destinations = Vec::new();
    let rhs = rhs.trim();
    if !rhs.is_empty() {
        for dest in rhs.split(',') {
            let dest = dest.trim();
            if dest.is_empty() || !is_valid_name(dest) {
                return Err(PulsimError::parse(
                    line,
                    format!("invalid destination name '{dest}'"),
                ));
            }
            destinations.push(dest.to_string());
        }
    }

    Ok(ModuleDef {
        symbol,
        name: name.to_string(),
        destinations,
        line,
    })
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
