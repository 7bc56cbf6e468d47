//! Pulse-propagation kernel.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::error::{PulsimError, Result};
use crate::network::{Level, Network, Pulse};

/// Cumulative pulse counts by level, across every press of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseTallies {
    /// Low pulses observed, button pulses included
    pub low: u64,
    /// High pulses observed
    pub high: u64,
}

impl PulseTallies {
    /// Product of the two tallies, or `None` on overflow.
    pub fn product(&self) -> Option<u64> {
        self.low.checked_mul(self.high)
    }
}

/// The pulse-propagation simulator.
///
/// Owns the network and is its sole mutator for the lifetime of a run.
/// Module state accumulates across presses: flip-flops stay toggled and
/// conjunctions remember, so presses are cumulative, never independent.
pub struct Simulator {
    network: Network,
    queue: VecDeque<Pulse>,
    tallies: PulseTallies,
    presses: u64,
}

impl Simulator {
    /// Create a simulator for a freshly built network.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            queue: VecDeque::new(),
            tallies: PulseTallies::default(),
            presses: 0,
        }
    }

    /// Press the button once: inject the button→broadcaster low pulse and
    /// drain the queue to exhaustion. Returns whether the sink received a
    /// low pulse during this press.
    pub fn press_button(&mut self) -> Result<bool> {
        self.press_with(|_| {})
    }

    /// Like [`press_button`](Self::press_button), invoking `observe` for
    /// every pulse in delivery order.
    ///
    /// The queue is strict FIFO: sibling pulses emitted in one step are
    /// delivered before any pulse they cause, so propagation is
    /// breadth-first. The observer runs outside the delivery itself and
    /// cannot alter ordering or tallies.
    pub fn press_with(&mut self, mut observe: impl FnMut(&Pulse)) -> Result<bool> {
        self.presses += 1;
        let sink = self.network.sink();
        let mut sink_saw_low = false;

        self.queue.push_back(Pulse::new(
            self.network.button(),
            self.network.broadcaster(),
            Level::Low,
        ));

        while let Some(pulse) = self.queue.pop_front() {
            let tally = match pulse.level {
                Level::Low => &mut self.tallies.low,
                Level::High => &mut self.tallies.high,
            };
            *tally = tally.checked_add(1).ok_or(PulsimError::TallyOverflow {
                presses: self.presses,
            })?;

            if pulse.level.is_low() && Some(pulse.target) == sink {
                sink_saw_low = true;
            }

            observe(&pulse);
            let emitted = self.network.module_mut(pulse.target).handle_pulse(&pulse);
            self.queue.extend(emitted.iter().copied());
        }

        trace!("press {}: tallies {:?}", self.presses, self.tallies);
        Ok(sink_saw_low)
    }

    /// Press the button `press_count` times and return the cumulative
    /// tallies.
    pub fn simulate_fixed_presses(&mut self, press_count: u64) -> Result<PulseTallies> {
        for _ in 0..press_count {
            self.press_button()?;
        }
        debug!(
            "{} presses: {} low, {} high",
            self.presses, self.tallies.low, self.tallies.high
        );
        Ok(self.tallies)
    }

    /// Press the button until the sink first receives a low pulse,
    /// returning the press count, or `None` if the network has no sink or
    /// `max_presses` runs out first.
    ///
    /// This is the brute-force counterpart of the structural cycle
    /// analyzer, feasible only for small networks.
    pub fn presses_until_sink_low(&mut self, max_presses: u64) -> Result<Option<u64>> {
        if self.network.sink().is_none() {
            return Ok(None);
        }
        for _ in 0..max_presses {
            if self.press_button()? {
                return Ok(Some(self.presses));
            }
        }
        Ok(None)
    }

    /// Cumulative tallies so far.
    pub fn tallies(&self) -> PulseTallies {
        self.tallies
    }

    /// Number of presses performed so far.
    pub fn presses(&self) -> u64 {
        self.presses
    }

    /// The simulated network.
    pub fn network(&self) -> &Network {
        &self.network
    }
}

/// Run the fixed-press query on a freshly built network.
pub fn simulate_fixed_presses(network: Network, press_count: u64) -> Result<PulseTallies> {
    Simulator::new(network).simulate_fixed_presses(press_count)
}
