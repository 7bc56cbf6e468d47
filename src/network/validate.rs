//! Network validation.

use crate::error::{PulsimError, Result};

use super::module::ModuleKind;
use super::types::ModuleId;
use super::Network;

/// Validate a finalized network's cross-cutting invariants.
///
/// Finalization already rejects malformed input; this pass double-checks
/// the invariants later stages lean on:
/// - the wire relation is its own transpose
/// - every conjunction's memory table covers exactly its inputs
/// - the button has no inputs and feeds only the broadcaster
pub fn validate_network(network: &Network) -> Result<()> {
    for (i, module) in network.modules().iter().enumerate() {
        let id = ModuleId(i);

        for &target in module.outputs() {
            if !network.module(target).inputs().contains(&id) {
                return Err(PulsimError::invalid_topology(format!(
                    "wire {} -> {} has no transposed input entry",
                    module.name(),
                    network.module(target).name()
                )));
            }
        }
        for &source in module.inputs() {
            if !network.module(source).outputs().contains(&id) {
                return Err(PulsimError::invalid_topology(format!(
                    "input {} of {} has no transposed output entry",
                    network.module(source).name(),
                    module.name()
                )));
            }
        }

        if let ModuleKind::Conjunction(state) = module.kind() {
            let distinct: std::collections::HashSet<_> = module.inputs().iter().collect();
            if state.memory().len() != distinct.len() {
                return Err(PulsimError::invalid_topology(format!(
                    "conjunction {} tracks {} inputs but has {} distinct",
                    module.name(),
                    state.memory().len(),
                    distinct.len()
                )));
            }
        }
    }

    let button = network.module(network.button());
    if !button.inputs().is_empty() || button.outputs() != [network.broadcaster()].as_slice() {
        return Err(PulsimError::invalid_topology(
            "button must have no inputs and feed only the broadcaster",
        ));
    }

    Ok(())
}
