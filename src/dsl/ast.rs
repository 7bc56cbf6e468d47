//! Parsed representation of a module-definition file.

/// Kind symbol prefixing a module name in the definition grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSymbol {
    /// No prefix: the broadcaster, or a designated sink name
    Plain,
    /// `%` prefix
    FlipFlop,
    /// `&` prefix
    Conjunction,
}

/// A single module definition line.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    /// Kind symbol stripped from the name
    pub symbol: KindSymbol,
    /// Module name (without the symbol)
    pub name: String,
    /// Destination module names, in declaration order
    pub destinations: Vec<String>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Complete parsed representation of a definition file.
#[derive(Debug, Clone, Default)]
pub struct NetworkAst {
    /// All module definitions, in file order
    pub modules: Vec<ModuleDef>,
}

impl NetworkAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }
}
