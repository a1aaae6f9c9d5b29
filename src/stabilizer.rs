// src/stabilizer.rs
//
// Debounces the per-cycle light classification. A single frame is
// never allowed to change the published decision; a new state has to
// survive a run of consecutive observations first. Every cycle still
// emits a value, so the planner downstream is never left without one.

use crate::types::LightState;
use tracing::{debug, info};

pub struct LightStateStabilizer {
    state: LightState,
    state_count: u32,
    last_published_wp: i64,
    threshold: u32,
}

impl LightStateStabilizer {
    pub fn new(threshold: u32) -> Self {
        Self {
            state: LightState::Unknown,
            state_count: 0,
            last_published_wp: -1,
            threshold,
        }
    }

    /// One observation cycle. Returns the waypoint index to publish:
    /// the candidate's stop waypoint once a Red has stabilized, -1 once
    /// any other state has, and the previously committed value while a
    /// new state is still being confirmed.
    pub fn update(&mut self, candidate_wp: i64, candidate: LightState) -> i64 {
        if candidate != self.state {
            // First sighting of a different state. Restart the count and
            // keep publishing the last confirmed decision.
            debug!(
                "light state {:?} -> {:?}, restarting confirmation",
                self.state, candidate
            );
            self.state = candidate;
            self.state_count = 0;
        } else if self.state_count >= self.threshold {
            // Seen threshold + 1 times in a row: commit.
            let confirmed = if candidate == LightState::Red {
                candidate_wp
            } else {
                -1
            };
            if confirmed != self.last_published_wp {
                info!(
                    "{:?} stable after {} cycles, stop waypoint {} -> {}",
                    self.state,
                    self.state_count + 1,
                    self.last_published_wp,
                    confirmed
                );
            }
            self.last_published_wp = confirmed;
        }
        self.state_count += 1;

        self.last_published_wp
    }

    /// Back to the initial state, as on process restart.
    pub fn reset(&mut self) {
        self.state = LightState::Unknown;
        self.state_count = 0;
        self.last_published_wp = -1;
    }
}
