//! Honey controller implementation.

use crate::congestion_control::{
    CongestionControl, CongestionControlAlgorithm, CongestionControlStats,
};
use crate::reno;
use crate::window::{CaState, SenderWindow, MIN_SSTHRESH};

use super::config::{
    CONGESTION_RTT_RATIO, HONEY_INIT_RTT_US, SHRINK_DENOMINATOR, SHRINK_NUMERATOR,
};
use super::stats::HoneyStats;

/// Honey congestion controller.
///
/// One instance per connection. The host calls [`CongestionControl::init`]
/// once, then feeds RTT samples, phase changes and growth rounds in whatever
/// order its ACK processing produces them.
#[derive(Debug, Clone)]
pub struct HoneyController {
    /// Heuristic governs growth; only true in the Open phase.
    heuristic_enabled: bool,
    /// Latest congestion estimate, refreshed on heuristic growth rounds.
    congested: bool,
    /// Running minimum of valid RTT samples (microseconds).
    rtt_min_us: u32,
    /// Latest valid RTT sample (microseconds).
    rtt_latest_us: u32,

    // Statistics
    rounds: u64,
    congested_rounds: u64,
    baseline_rounds: u64,
    clamp_hits: u64,
    invalid_samples: u64,
}

impl Default for HoneyController {
    fn default() -> Self {
        Self {
            heuristic_enabled: true,
            congested: false,
            rtt_min_us: HONEY_INIT_RTT_US,
            rtt_latest_us: HONEY_INIT_RTT_US,
            rounds: 0,
            congested_rounds: 0,
            baseline_rounds: 0,
            clamp_hits: 0,
            invalid_samples: 0,
        }
    }
}

impl HoneyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heuristic_enabled(&self) -> bool {
        self.heuristic_enabled
    }

    pub fn congested(&self) -> bool {
        self.congested
    }

    pub fn rtt_min_us(&self) -> u32 {
        self.rtt_min_us
    }

    pub fn rtt_latest_us(&self) -> u32 {
        self.rtt_latest_us
    }

    /// Congestion estimate: is the latest RTT more than twice the floor?
    fn detect_congestion(&self) -> bool {
        u64::from(self.rtt_latest_us) > u64::from(self.rtt_min_us) * CONGESTION_RTT_RATIO
    }

    /// Grow `cwnd` by `inc`, clamping with halves so the comparison cannot overflow.
    ///
    /// Returns true if the clamp path was taken.
    fn apply_increment(window: &mut SenderWindow, inc: u32) -> bool {
        if (window.cwnd >> 1) + (inc >> 1) > (window.cwnd_clamp >> 1) {
            window.cwnd = (window.cwnd >> 1) + (window.cwnd_clamp >> 1);
            true
        } else {
            window.cwnd = window.cwnd.saturating_add(inc);
            false
        }
    }

    pub fn stats(&self) -> HoneyStats {
        HoneyStats {
            rtt_min_us: self.rtt_min_us,
            rtt_latest_us: self.rtt_latest_us,
            congested: self.congested,
            heuristic_enabled: self.heuristic_enabled,
            rounds: self.rounds,
            congested_rounds: self.congested_rounds,
            baseline_rounds: self.baseline_rounds,
            clamp_hits: self.clamp_hits,
            invalid_samples: self.invalid_samples,
        }
    }
}

impl CongestionControl for HoneyController {
    fn init(&mut self) {
        *self = Self::default();
    }

    fn pkts_acked(&mut self, _cnt: u32, rtt_us: i32) {
        if rtt_us > 0 {
            self.rtt_latest_us = rtt_us.unsigned_abs();
        } else {
            self.invalid_samples = self.invalid_samples.saturating_add(1);
        }
        self.rtt_min_us = self.rtt_min_us.min(self.rtt_latest_us);
    }

    fn set_state(&mut self, new_state: CaState) {
        let enabled = new_state.is_open();
        if enabled != self.heuristic_enabled {
            tracing::debug!(
                state = %new_state,
                heuristic_enabled = enabled,
                "Honey heuristic toggled by phase change"
            );
        }
        self.heuristic_enabled = enabled;
    }

    fn cong_avoid(&mut self, window: &mut SenderWindow, _ack: u32, acked: u32) {
        self.rounds = self.rounds.saturating_add(1);

        if !self.heuristic_enabled {
            self.baseline_rounds = self.baseline_rounds.saturating_add(1);
            reno::cong_avoid(window, acked);
            return;
        }

        let congested = self.detect_congestion();
        if congested != self.congested {
            tracing::debug!(
                rtt_latest_us = self.rtt_latest_us,
                rtt_min_us = self.rtt_min_us,
                congested,
                "Honey congestion estimate changed"
            );
        }
        self.congested = congested;
        if congested {
            self.congested_rounds = self.congested_rounds.saturating_add(1);
        }

        let slow_start = window.in_slow_start();
        let inc = if slow_start { window.cwnd } else { 1 };

        let old_cwnd = window.cwnd;
        if Self::apply_increment(window, inc) {
            self.clamp_hits = self.clamp_hits.saturating_add(1);
        }

        tracing::trace!(
            old_cwnd,
            new_cwnd = window.cwnd,
            cwnd_clamp = window.cwnd_clamp,
            slow_start,
            congested,
            "Honey cwnd growth"
        );
    }

    fn ssthresh(&self, window: &SenderWindow) -> u32 {
        let target = if self.congested {
            // Widened so the multiply cannot wrap; the result never exceeds cwnd.
            (u64::from(window.cwnd) * SHRINK_NUMERATOR / SHRINK_DENOMINATOR) as u32
        } else {
            window.cwnd
        };
        let target = target.max(MIN_SSTHRESH);

        tracing::debug!(
            cwnd = window.cwnd,
            ssthresh = target,
            congested = self.congested,
            "Honey shrink target"
        );
        target
    }

    fn name(&self) -> &'static str {
        "honey"
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        CongestionControlAlgorithm::Honey
    }

    fn stats(&self) -> CongestionControlStats {
        CongestionControlStats {
            algorithm: CongestionControlAlgorithm::Honey,
            rtt_min_us: Some(self.rtt_min_us),
            rtt_latest_us: Some(self.rtt_latest_us),
            congested: self.congested,
            rounds: self.rounds,
        }
    }
}
