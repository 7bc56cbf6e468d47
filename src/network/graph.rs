//! Network construction and the finalized module graph.
//!
//! Construction is two-phase and enforced by type: [`NetworkBuilder`] is
//! append-only, and [`NetworkBuilder::finalize`] consumes it to produce a
//! [`Network`] whose shape can no longer change. Routing a pulse through
//! an unfinalized module is therefore unrepresentable.

use std::collections::HashMap;

use log::debug;

use super::module::{Module, ModuleKind};
use super::types::ModuleId;
use crate::dsl::{KindSymbol, NetworkAst};
use crate::error::{PulsimError, Result};
use crate::{ACCEPTED_SINK_NAMES, BROADCASTER_NAME, BUTTON_NAME};

/// A module staged for finalization, with destinations still by name.
#[derive(Debug)]
struct StagedModule {
    module: Module,
    destinations: Vec<String>,
}

/// Append-only network under construction.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    staged: Vec<StagedModule>,
    index: HashMap<String, ModuleId>,
}

impl NetworkBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a module with its destination names. `line` is the source
    /// line of the definition, for error reporting (0 for synthetic
    /// construction).
    pub fn add_module(
        &mut self,
        name: impl Into<String>,
        kind: ModuleKind,
        destinations: Vec<String>,
        line: usize,
    ) -> Result<()> {
        let name = name.into();
        if name == BUTTON_NAME {
            return Err(PulsimError::ReservedName { name, line });
        }
        if self.index.contains_key(&name) {
            return Err(PulsimError::DuplicateModule { name });
        }

        let id = ModuleId(self.staged.len());
        self.index.insert(name.clone(), id);
        self.staged.push(StagedModule {
            module: Module::new(name, kind),
            destinations,
        });
        Ok(())
    }

    /// Resolve all names, wire the graph, and freeze it.
    ///
    /// Undefined destination names become receiver modules when they are
    /// accepted sink names and are dangling references otherwise. The
    /// synthetic button is created here, wired to the broadcaster.
    pub fn finalize(mut self) -> Result<Network> {
        // Reject routing into the button and find implicit receivers.
        let mut implicit: Vec<String> = Vec::new();
        for staged in &self.staged {
            for dest in &staged.destinations {
                if dest == BUTTON_NAME {
                    return Err(PulsimError::ButtonAsDestination {
                        origin: staged.module.name().to_string(),
                    });
                }
                if !self.index.contains_key(dest) && !implicit.contains(dest) {
                    if ACCEPTED_SINK_NAMES.contains(&dest.as_str()) {
                        implicit.push(dest.clone());
                    } else {
                        return Err(PulsimError::DanglingReference {
                            origin: staged.module.name().to_string(),
                            target: dest.clone(),
                        });
                    }
                }
            }
        }
        for name in implicit {
            let id = ModuleId(self.staged.len());
            self.index.insert(name.clone(), id);
            self.staged.push(StagedModule {
                module: Module::new(name, ModuleKind::Receiver),
                destinations: Vec::new(),
            });
        }

        // Exactly one sink candidate may exist.
        let sinks: Vec<ModuleId> = self
            .staged
            .iter()
            .enumerate()
            .filter(|(_, s)| s.module.kind().is_receiver())
            .map(|(i, _)| ModuleId(i))
            .collect();
        if sinks.len() > 1 {
            return Err(PulsimError::MultipleSinks {
                names: sinks
                    .iter()
                    .map(|&id| self.staged[id.0].module.name().to_string())
                    .collect(),
            });
        }
        let sink = sinks.first().copied();

        let broadcaster = *self
            .index
            .get(BROADCASTER_NAME)
            .ok_or(PulsimError::MissingBroadcaster)?;
        if !matches!(self.staged[broadcaster.0].module.kind(), ModuleKind::Broadcast) {
            return Err(PulsimError::invalid_topology(format!(
                "module '{BROADCASTER_NAME}' is not a broadcast module"
            )));
        }

        // The synthetic button, wired to the broadcaster like any module.
        let button = ModuleId(self.staged.len());
        self.index.insert(BUTTON_NAME.to_string(), button);
        self.staged.push(StagedModule {
            module: Module::new(BUTTON_NAME, ModuleKind::Button),
            destinations: vec![BROADCASTER_NAME.to_string()],
        });

        // Resolve edges in definition order, then establish the wire
        // relation and its transpose together.
        let mut edges: Vec<(ModuleId, ModuleId)> = Vec::new();
        for (i, staged) in self.staged.iter().enumerate() {
            let source = ModuleId(i);
            for dest in &staged.destinations {
                let target = *self.index.get(dest).ok_or_else(|| {
                    PulsimError::DanglingReference {
                        origin: staged.module.name().to_string(),
                        target: dest.clone(),
                    }
                })?;
                edges.push((source, target));
            }
        }

        let mut modules: Vec<Module> = self.staged.into_iter().map(|s| s.module).collect();
        for &(source, target) in &edges {
            modules[source.0].push_output(target);
            modules[target.0].push_input(source);
        }
        for (i, module) in modules.iter_mut().enumerate() {
            module.finalize_wiring(ModuleId(i));
        }

        debug!(
            "finalized network: {} modules, {} wires, sink {:?}",
            modules.len(),
            edges.len(),
            sink.map(|id| modules[id.0].name().to_string()),
        );

        Ok(Network {
            modules,
            index: self.index,
            broadcaster,
            button,
            sink,
        })
    }
}

/// A finalized module graph: immutable in shape, addressed by id.
#[derive(Debug, Clone)]
pub struct Network {
    modules: Vec<Module>,
    index: HashMap<String, ModuleId>,
    broadcaster: ModuleId,
    button: ModuleId,
    sink: Option<ModuleId>,
}

impl Network {
    /// Build a network from a parsed definition file.
    pub fn from_ast(ast: NetworkAst) -> Result<Self> {
        let mut builder = NetworkBuilder::new();
        for def in ast.modules {
            let kind = match def.symbol {
                KindSymbol::FlipFlop => ModuleKind::flip_flop(),
                KindSymbol::Conjunction => ModuleKind::conjunction(),
                KindSymbol::Plain if def.name == BROADCASTER_NAME => ModuleKind::Broadcast,
                KindSymbol::Plain if ACCEPTED_SINK_NAMES.contains(&def.name.as_str()) => {
                    if !def.destinations.is_empty() {
                        return Err(PulsimError::SinkWithOutputs { name: def.name });
                    }
                    ModuleKind::Receiver
                }
                KindSymbol::Plain => {
                    return Err(PulsimError::invalid_topology(format!(
                        "plain module '{}' at line {} is neither the broadcaster nor an accepted sink",
                        def.name, def.line
                    )));
                }
            };
            builder.add_module(def.name, kind, def.destinations, def.line)?;
        }
        builder.finalize()
    }

    /// All modules, indexed by [`ModuleId`].
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Get a module by id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of range; ids originating from this
    /// network are always in range.
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    /// Find a module id by name.
    pub fn find(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// The broadcaster module.
    pub fn broadcaster(&self) -> ModuleId {
        self.broadcaster
    }

    /// The synthetic button module.
    pub fn button(&self) -> ModuleId {
        self.button
    }

    /// The sink module, if the network has one.
    pub fn sink(&self) -> Option<ModuleId> {
        self.sink
    }

    /// Number of modules, button included.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    fn build(text: &str) -> Result<Network> {
        Network::from_ast(dsl::parse(text).unwrap())
    }

    #[test]
    fn test_build_canonical_example() {
        let network = build(
            "broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a",
        )
        .unwrap();

        // Five defined modules plus the button.
        assert_eq!(network.len(), 6);
        assert!(network.sink().is_none());
        assert_eq!(network.find("inv"), Some(ModuleId(4)));
        assert_eq!(network.find("ghost"), None);

        let broadcaster = network.module(network.broadcaster());
        let names: Vec<&str> = broadcaster
            .outputs()
            .iter()
            .map(|&id| network.module(id).name())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_button_feeds_broadcaster() {
        let network = build("broadcaster -> a\n%a -> rx").unwrap();
        let button = network.button();
        assert_eq!(network.module(button).outputs(), &[network.broadcaster()]);
        assert_eq!(network.module(network.broadcaster()).inputs(), &[button]);
    }

    #[test]
    fn test_wire_relation_is_transposed() {
        let network = build("broadcaster -> a, b\n%a -> con\n%b -> con\n&con -> rx").unwrap();
        for (i, module) in network.modules().iter().enumerate() {
            let id = ModuleId(i);
            for &out in module.outputs() {
                assert!(network.module(out).inputs().contains(&id));
            }
            for &input in module.inputs() {
                assert!(network.module(input).outputs().contains(&id));
            }
        }
    }

    #[test]
    fn test_undefined_sink_name_becomes_receiver() {
        let network = build("broadcaster -> a\n%a -> output").unwrap();
        let sink = network.sink().unwrap();
        assert!(network.module(sink).kind().is_receiver());
        assert_eq!(network.module(sink).name(), "output");
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let err = build("broadcaster -> a\n%a -> ghost").unwrap_err();
        assert!(matches!(
            err,
            PulsimError::DanglingReference { origin, target }
                if origin == "a" && target == "ghost"
        ));
    }

    #[test]
    fn test_multiple_sinks_rejected() {
        let err = build("broadcaster -> a, b\n%a -> rx\n%b -> output").unwrap_err();
        assert!(matches!(err, PulsimError::MultipleSinks { .. }));
    }

    #[test]
    fn test_button_as_destination_rejected() {
        let err = build("broadcaster -> a\n%a -> button").unwrap_err();
        assert!(matches!(
            err,
            PulsimError::ButtonAsDestination { origin } if origin == "a"
        ));
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let err = build("broadcaster -> a\n%a -> rx\n%a -> rx").unwrap_err();
        assert!(matches!(err, PulsimError::DuplicateModule { name } if name == "a"));
    }

    #[test]
    fn test_reserved_button_name_rejected() {
        let err = build("broadcaster -> a\n%button -> a").unwrap_err();
        assert!(matches!(err, PulsimError::ReservedName { .. }));
    }

    #[test]
    fn test_missing_broadcaster_rejected() {
        let err = build("%a -> rx").unwrap_err();
        assert!(matches!(err, PulsimError::MissingBroadcaster));
    }

    #[test]
    fn test_plain_module_must_be_broadcaster_or_sink() {
        let err = build("broadcaster -> a\nmystery -> a").unwrap_err();
        assert!(matches!(err, PulsimError::InvalidTopology { .. }));
    }

    #[test]
    fn test_defined_sink_with_outputs_rejected() {
        let err = build("broadcaster -> rx\nrx -> broadcaster").unwrap_err();
        assert!(matches!(err, PulsimError::SinkWithOutputs { name } if name == "rx"));
    }
}
