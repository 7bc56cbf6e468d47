//! Module kinds and their pulse-handling state machines.
//!
//! The kind set is closed: dispatch is an exhaustive match, so adding a
//! kind forces every call site to be revisited.

use std::collections::HashMap;

use super::types::{Level, ModuleId, Pulse};

/// State of a flip-flop module: a single on/off bit, starting off.
#[derive(Debug, Clone, Default)]
pub struct FlipFlopState {
    /// Current on/off state
    pub on: bool,
}

/// State of a conjunction module: the last-seen level of every registered
/// input, plus an incrementally maintained count of inputs currently high.
///
/// The count is consulted on every pulse, so it is adjusted by ±1 when a
/// remembered level actually changes and never recomputed from scratch.
#[derive(Debug, Clone, Default)]
pub struct ConjunctionState {
    /// Stable input -> memory slot mapping, fixed at finalization
    index_of: HashMap<ModuleId, usize>,
    /// Last-seen level per input (true = high), initialized low
    memory: Vec<bool>,
    /// Number of true entries in `memory`
    high_count: usize,
}

impl ConjunctionState {
    /// Register the module's inputs, assigning memory slots in input
    /// order. One slot per distinct input.
    pub(crate) fn register_inputs(&mut self, inputs: &[ModuleId]) {
        self.index_of.clear();
        for &id in inputs {
            let slot = self.index_of.len();
            self.index_of.entry(id).or_insert(slot);
        }
        self.memory = vec![false; self.index_of.len()];
        self.high_count = 0;
    }

    /// Record a pulse from `source` and return the level to emit:
    /// low exactly when every registered input is currently high (NAND).
    ///
    /// # Panics
    ///
    /// Panics if `source` is not a registered input. The input map is fixed
    /// at finalization and all runtime pulses originate from finalized
    /// output lists, so an unregistered source is a construction bug.
    fn record(&mut self, source: ModuleId, level: Level) -> Level {
        let slot = *self.index_of.get(&source).unwrap_or_else(|| {
            panic!("conjunction received pulse from unregistered source {source}")
        });

        let high = level.is_high();
        if self.memory[slot] != high {
            self.memory[slot] = high;
            if high {
                self.high_count += 1;
            } else {
                self.high_count -= 1;
            }
        }

        if self.high_count == self.memory.len() {
            Level::Low
        } else {
            Level::High
        }
    }

    /// Number of inputs currently remembered as high.
    pub fn high_count(&self) -> usize {
        self.high_count
    }

    /// Last-seen levels per input slot (true = high).
    pub fn memory(&self) -> &[bool] {
        &self.memory
    }
}

/// The kind of a module, with kind-specific mutable state.
#[derive(Debug, Clone)]
pub enum ModuleKind {
    /// Re-emits the incoming level to all outputs. Stateless.
    Broadcast,
    /// One bit of state, toggled by low pulses, inert on high pulses.
    FlipFlop(FlipFlopState),
    /// NAND over the last-seen levels of its registered inputs.
    Conjunction(ConjunctionState),
    /// Terminal module: accepts pulses, emits nothing.
    Receiver,
    /// Synthetic pulse source feeding the broadcaster. Never receives.
    Button,
}

impl ModuleKind {
    /// Create a flip-flop kind in the off state.
    pub fn flip_flop() -> Self {
        Self::FlipFlop(FlipFlopState::default())
    }

    /// Create a conjunction kind with no inputs registered yet.
    pub fn conjunction() -> Self {
        Self::Conjunction(ConjunctionState::default())
    }

    pub fn is_flip_flop(&self) -> bool {
        matches!(self, Self::FlipFlop(_))
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(self, Self::Conjunction(_))
    }

    pub fn is_receiver(&self) -> bool {
        matches!(self, Self::Receiver)
    }
}

/// A node in the network: a named module with wired inputs and outputs.
///
/// Input order is insertion order and provides the conjunction memory
/// slots; output order is insertion order and determines fan-out order,
/// which the event queue depends on.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    kind: ModuleKind,
    inputs: Vec<ModuleId>,
    outputs: Vec<ModuleId>,
    /// Outgoing pulses per level (low = 0, high = 1), cached at
    /// finalization so fan-out costs no allocation per event.
    emits: [Vec<Pulse>; 2],
}

impl Module {
    pub(crate) fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            emits: [Vec::new(), Vec::new()],
        }
    }

    pub(crate) fn push_input(&mut self, id: ModuleId) {
        self.inputs.push(id);
    }

    pub(crate) fn push_output(&mut self, id: ModuleId) {
        self.outputs.push(id);
    }

    /// Freeze the module's wiring: build the per-level emission caches and
    /// register conjunction inputs. Called once, by network finalization.
    pub(crate) fn finalize_wiring(&mut self, self_id: ModuleId) {
        for (level_idx, level) in [(0, Level::Low), (1, Level::High)] {
            self.emits[level_idx] = self
                .outputs
                .iter()
                .map(|&target| Pulse::new(self_id, target, level))
                .collect();
        }
        if let ModuleKind::Conjunction(state) = &mut self.kind {
            state.register_inputs(&self.inputs);
        }
    }

    /// Deliver a pulse to this module, mutating its state and returning
    /// the pulses it emits in output order.
    ///
    /// # Panics
    ///
    /// Panics if the pulse is routed into the button, or if a conjunction
    /// receives a pulse from an unregistered source. Both indicate a bug in
    /// network construction, not a runtime condition.
    pub fn handle_pulse(&mut self, pulse: &Pulse) -> &[Pulse] {
        match &mut self.kind {
            ModuleKind::Broadcast => &self.emits[pulse.level.index()],
            ModuleKind::FlipFlop(state) => {
                if pulse.level.is_high() {
                    return &[];
                }
                state.on = !state.on;
                let level = if state.on { Level::High } else { Level::Low };
                &self.emits[level.index()]
            }
            ModuleKind::Conjunction(state) => {
                let level = state.record(pulse.source, pulse.level);
                &self.emits[level.index()]
            }
            ModuleKind::Receiver => &[],
            ModuleKind::Button => {
                panic!("pulse {pulse} routed into button module '{}'", self.name)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ModuleKind {
        &self.kind
    }

    pub fn inputs(&self) -> &[ModuleId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ModuleId] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wired(name: &str, kind: ModuleKind, inputs: &[usize], outputs: &[usize]) -> Module {
        let mut module = Module::new(name, kind);
        for &i in inputs {
            module.push_input(ModuleId(i));
        }
        for &o in outputs {
            module.push_output(ModuleId(o));
        }
        module.finalize_wiring(ModuleId(9));
        module
    }

    #[test]
    fn flip_flop_ignores_high_pulses() {
        let mut ff = wired("a", ModuleKind::flip_flop(), &[0], &[1]);
        for _ in 0..5 {
            let out = ff.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::High));
            assert!(out.is_empty());
        }
        match ff.kind() {
            ModuleKind::FlipFlop(state) => assert!(!state.on),
            _ => unreachable!(),
        }
    }

    #[test]
    fn flip_flop_toggles_on_low_and_emits_new_state() {
        let mut ff = wired("a", ModuleKind::flip_flop(), &[0], &[1, 2]);

        let out = ff.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::Low));
        assert_eq!(
            out,
            &[
                Pulse::new(ModuleId(9), ModuleId(1), Level::High),
                Pulse::new(ModuleId(9), ModuleId(2), Level::High),
            ]
        );

        let out = ff.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::Low));
        assert_eq!(out[0].level, Level::Low);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn conjunction_acts_as_nand() {
        let mut conj = wired("inv", ModuleKind::conjunction(), &[0, 1], &[2]);

        // One input high, one still low: emit high.
        let out = conj.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::High));
        assert_eq!(out[0].level, Level::High);

        // Both high: emit low.
        let out = conj.handle_pulse(&Pulse::new(ModuleId(1), ModuleId(9), Level::High));
        assert_eq!(out[0].level, Level::Low);

        // One drops back low: emit high again.
        let out = conj.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::Low));
        assert_eq!(out[0].level, Level::High);
    }

    #[test]
    fn conjunction_high_count_matches_memory() {
        let mut conj = wired("con", ModuleKind::conjunction(), &[0, 1, 2], &[3]);
        let sequence = [
            (0, Level::High),
            (0, Level::High), // repeat must not double-count
            (1, Level::High),
            (0, Level::Low),
            (2, Level::High),
            (1, Level::Low),
        ];
        for (source, level) in sequence {
            conj.handle_pulse(&Pulse::new(ModuleId(source), ModuleId(9), level));
            match conj.kind() {
                ModuleKind::Conjunction(state) => {
                    let trues = state.memory().iter().filter(|&&b| b).count();
                    assert_eq!(state.high_count(), trues);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    #[should_panic(expected = "unregistered source")]
    fn conjunction_panics_on_unregistered_source() {
        let mut conj = wired("con", ModuleKind::conjunction(), &[0], &[1]);
        conj.handle_pulse(&Pulse::new(ModuleId(7), ModuleId(9), Level::High));
    }

    #[test]
    #[should_panic(expected = "routed into button")]
    fn button_panics_on_incoming_pulse() {
        let mut button = wired("button", ModuleKind::Button, &[], &[0]);
        button.handle_pulse(&Pulse::new(ModuleId(0), ModuleId(9), Level::Low));
    }
}
