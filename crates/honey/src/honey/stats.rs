//! Honey statistics.

use serde::Serialize;

/// Snapshot of a [`HoneyController`](super::HoneyController) for telemetry.
///
/// The counters are informational only and never feed back into decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoneyStats {
    /// Smallest valid RTT seen (microseconds).
    pub rtt_min_us: u32,
    /// Most recent valid RTT (microseconds).
    pub rtt_latest_us: u32,
    /// Congestion estimate from the last heuristic round.
    pub congested: bool,
    /// Whether the heuristic currently governs growth.
    pub heuristic_enabled: bool,
    /// Growth rounds processed.
    pub rounds: u64,
    /// Heuristic rounds that concluded the path was congested.
    pub congested_rounds: u64,
    /// Rounds handed to the Reno baseline.
    pub baseline_rounds: u64,
    /// Rounds where growth was limited by the window clamp.
    pub clamp_hits: u64,
    /// RTT samples discarded as unusable (zero or negative).
    pub invalid_samples: u64,
}
