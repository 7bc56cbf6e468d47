//! Structural cycle analysis of binary-counter networks.
//!
//! Full simulation cannot answer "when does the sink first go low" for
//! real inputs: the press count is astronomically large. This analyzer
//! instead proves the answer from topology alone, for exactly one
//! network family:
//!
//! ```text
//! broadcaster ──> flip-flop chain ──> central ──> branch gate ─┐
//! broadcaster ──> flip-flop chain ──> central ──> branch gate ─┼──> final gate ──> sink
//! broadcaster ──> flip-flop chain ──> central ──> branch gate ─┘
//! ```
//!
//! Each chain is a ripple counter; the subset of its cells wired into
//! the branch's central conjunction spells, least-significant-bit first,
//! the press count at which the branch fires. Independent branches
//! recombine by least common multiple.
//!
//! The matcher is deliberately narrow: any deviation from the family
//! yields "not applicable" rather than a guess. It reads topology only
//! and never touches runtime state.

use std::collections::HashSet;

use log::debug;

use crate::error::{PulsimError, Result};
use crate::network::{ModuleId, Network};

/// Compute the first press at which the sink receives a low pulse.
///
/// Returns `Ok(None)` when the network does not match the decomposable
/// counter family; that is a typed outcome, not an error. Arithmetic
/// overflow during reconstruction or LCM combination is an error: it
/// means the counter model does not hold for this input.
pub fn find_sink_activation_press_count(network: &Network) -> Result<Option<u64>> {
    let Some(sink) = network.sink() else {
        return Ok(None);
    };

    // The sink must hang off a single final conjunction gate.
    let [final_gate] = network.module(sink).inputs() else {
        return Ok(None);
    };
    if !network.module(*final_gate).kind().is_conjunction() {
        return Ok(None);
    }

    // Each final-gate input is a single-input conjunction (the branch
    // gate) fed by the branch's central conjunction.
    let mut pending_centrals: HashSet<ModuleId> = HashSet::new();
    for &gate in network.module(*final_gate).inputs() {
        if !network.module(gate).kind().is_conjunction() {
            return Ok(None);
        }
        let [central] = network.module(gate).inputs() else {
            return Ok(None);
        };
        if !network.module(*central).kind().is_conjunction() {
            return Ok(None);
        }
        if !pending_centrals.insert(*central) {
            // Two branch gates sharing a central is outside the family.
            return Ok(None);
        }
    }
    if pending_centrals.is_empty() {
        return Ok(None);
    }

    // Every broadcaster output starts an independent counter chain.
    let mut periods = Vec::new();
    for &entry in network.module(network.broadcaster()).outputs() {
        match walk_counter_branch(network, entry, &mut pending_centrals)? {
            Some(period) => periods.push(period),
            None => return Ok(None),
        }
    }
    if !pending_centrals.is_empty() {
        // A branch gate exists with no counter chain feeding it.
        return Ok(None);
    }

    let mut combined: u64 = 1;
    for &period in &periods {
        combined = lcm(combined, period).ok_or_else(|| {
            PulsimError::period_overflow(format!(
                "combining branch periods {periods:?} exceeds u64"
            ))
        })?;
    }

    debug!("branch periods {periods:?}, combined {combined}");
    Ok(Some(combined))
}

/// Walk one flip-flop chain from its entry cell, reconstructing the
/// branch period: bit `i` is set iff cell `i` feeds the branch's central
/// conjunction. The entry cell is bit 0.
///
/// Every cell's output set must split into the central and/or the single
/// successor cell; any other fan-out, a revisited cell, or a foreign
/// central makes the branch unanalyzable (`None`). A chain deeper than
/// 64 bits overflows the period and is an error.
fn walk_counter_branch(
    network: &Network,
    entry: ModuleId,
    pending_centrals: &mut HashSet<ModuleId>,
) -> Result<Option<u64>> {
    if !network.module(entry).kind().is_flip_flop() {
        return Ok(None);
    }

    let mut central: Option<ModuleId> = None;
    let mut visited: HashSet<ModuleId> = HashSet::new();
    let mut period: u64 = 0;
    let mut bit: u32 = 0;
    let mut current = entry;

    loop {
        if !visited.insert(current) {
            // The chain loops back on itself; not a ripple counter.
            return Ok(None);
        }

        let outputs = network.module(current).outputs();
        if outputs.is_empty() {
            return Ok(None);
        }

        let mut next: Option<ModuleId> = None;
        let mut feeds_central = false;
        for &out in outputs {
            let kind = network.module(out).kind();
            if kind.is_flip_flop() {
                if next.replace(out).is_some() {
                    return Ok(None);
                }
            } else if kind.is_conjunction() {
                match central {
                    None => {
                        central = Some(out);
                        feeds_central = true;
                    }
                    Some(c) if c == out => feeds_central = true,
                    Some(_) => return Ok(None),
                }
            } else {
                return Ok(None);
            }
        }

        if feeds_central {
            let mask = 1u64.checked_shl(bit).ok_or_else(|| {
                PulsimError::period_overflow(format!(
                    "counter chain from {} exceeds 64 bits",
                    network.module(entry).name()
                ))
            })?;
            period |= mask;
        }

        match next {
            Some(successor) => {
                current = successor;
                bit = bit.checked_add(1).ok_or_else(|| {
                    PulsimError::period_overflow("counter chain depth exceeds u32")
                })?;
            }
            None => break,
        }
    }

    let Some(central) = central else {
        // The chain never reached a conjunction; the branch cannot fire.
        return Ok(None);
    };
    if !pending_centrals.remove(&central) {
        // The chain feeds a conjunction that is not one of the branch
        // centrals collected from the final gate.
        return Ok(None);
    }

    Ok(Some(period))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple with checked multiplication.
fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;
    use crate::sim::Simulator;

    fn network(text: &str) -> Network {
        Network::from_ast(dsl::parse(text).unwrap()).unwrap()
    }

    /// One period-3 branch through the full gate stack.
    const SINGLE_BRANCH: &str = "broadcaster -> f0\n\
         %f0 -> f1, con\n\
         %f1 -> con\n\
         &con -> inv\n\
         &inv -> final\n\
         &final -> rx";

    #[test]
    fn test_single_branch_period() {
        let net = network(SINGLE_BRANCH);
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), Some(3));
    }

    #[test]
    fn test_analysis_agrees_with_simulation() {
        let net = network(SINGLE_BRANCH);
        let analyzed = find_sink_activation_press_count(&net).unwrap();

        let mut sim = Simulator::new(net);
        let simulated = sim.presses_until_sink_low(100).unwrap();
        assert_eq!(analyzed, simulated);
        assert_eq!(analyzed, Some(3));
    }

    #[test]
    fn test_two_branches_combine_by_lcm() {
        // Branch A counts to 3 (binary 11), branch B to 4 (binary 100).
        let net = network(
            "broadcaster -> f0, g0\n\
             %f0 -> f1, cona\n\
             %f1 -> cona\n\
             %g0 -> g1\n\
             %g1 -> g2\n\
             %g2 -> conb\n\
             &cona -> inva\n\
             &conb -> invb\n\
             &inva -> final\n\
             &invb -> final\n\
             &final -> rx",
        );
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), Some(12));
    }

    #[test]
    fn test_no_sink_is_not_applicable() {
        let net = network("broadcaster -> a\n%a -> b\n%b -> a");
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), None);
    }

    #[test]
    fn test_flip_flop_into_final_gate_is_rejected() {
        // One final-gate input is a flip-flop, not a branch gate.
        let net = network(
            "broadcaster -> f0, x\n\
             %f0 -> con\n\
             &con -> inv\n\
             &inv -> final\n\
             %x -> final\n\
             &final -> rx",
        );
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), None);
    }

    #[test]
    fn test_sink_with_two_inputs_is_rejected() {
        let net = network(
            "broadcaster -> f0\n\
             %f0 -> cona, conb\n\
             &cona -> rx\n\
             &conb -> rx",
        );
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), None);
    }

    #[test]
    fn test_stray_fan_out_in_chain_is_rejected() {
        // f0 feeds two successor flip-flops.
        let net = network(
            "broadcaster -> f0\n\
             %f0 -> f1, f2, con\n\
             %f1 -> con\n\
             %f2 -> con\n\
             &con -> inv\n\
             &inv -> final\n\
             &final -> rx",
        );
        assert_eq!(find_sink_activation_press_count(&net).unwrap(), None);
    }

    #[test]
    fn test_chain_deeper_than_64_bits_overflows() {
        let mut text = String::from("broadcaster -> f0\n");
        for i in 0..70 {
            text.push_str(&format!("%f{i} -> f{}, con\n", i + 1));
        }
        text.push_str("%f70 -> con\n&con -> inv\n&inv -> final\n&final -> rx");

        let err = find_sink_activation_press_count(&network(&text)).unwrap_err();
        assert!(matches!(err, PulsimError::PeriodOverflow { .. }));
    }
}
