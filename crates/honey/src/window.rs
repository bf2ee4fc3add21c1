//! Host-owned sender state that the congestion hooks read and mutate.
//!
//! A transport keeps one [`SenderWindow`] per connection and lends it to the
//! active strategy on every growth round. All counters are in segments.

use std::fmt;

/// Initial congestion window (IW10, RFC 6928).
pub const INITIAL_CWND: u32 = 10;

/// "No threshold yet" marker; keeps a fresh connection in slow start.
pub const INFINITE_SSTHRESH: u32 = 0x7fff_ffff;

/// Lowest slow start threshold any strategy hands back to the host.
pub const MIN_SSTHRESH: u32 = 2;

/// Per-connection window counters owned by the host transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderWindow {
    /// Congestion window (segments).
    pub cwnd: u32,
    /// Upper bound the window may never be grown past.
    pub cwnd_clamp: u32,
    /// Slow start threshold (segments).
    pub ssthresh: u32,
    /// Acknowledged segments credited towards the next linear increment.
    pub cwnd_cnt: u32,
    /// Whether the sender is actually using the window it has.
    ///
    /// Growth hooks that honour application limiting leave the window alone
    /// while this is false.
    pub cwnd_limited: bool,
}

impl SenderWindow {
    pub fn new(cwnd: u32, cwnd_clamp: u32) -> Self {
        Self {
            cwnd,
            cwnd_clamp,
            ssthresh: INFINITE_SSTHRESH,
            cwnd_cnt: 0,
            cwnd_limited: true,
        }
    }

    pub fn with_ssthresh(mut self, ssthresh: u32) -> Self {
        self.ssthresh = ssthresh;
        self
    }

    pub fn in_slow_start(&self) -> bool {
        self.cwnd < self.ssthresh
    }
}

impl Default for SenderWindow {
    fn default() -> Self {
        Self::new(INITIAL_CWND, u32::MAX)
    }
}

/// Congestion-control phase of a connection, as tracked by the host.
///
/// Only [`CaState::Open`] means "nothing suspicious is going on"; every other
/// phase is some flavour of reordering, reduction or loss handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaState {
    /// Normal operation, no loss or reordering outstanding.
    #[default]
    Open,
    /// Duplicate ACKs or SACKs seen, loss not yet assumed.
    Disorder,
    /// Window being reduced in response to a non-loss signal (e.g. local congestion).
    Cwr,
    /// Fast retransmit / fast recovery in progress.
    Recovery,
    /// Retransmission timeout; everything in flight presumed lost.
    Loss,
}

impl CaState {
    pub fn is_open(self) -> bool {
        matches!(self, CaState::Open)
    }

    /// Phases in which the host is shrinking the window and does not ask the
    /// strategy for growth.
    pub fn is_reducing(self) -> bool {
        matches!(self, CaState::Cwr | CaState::Recovery)
    }
}

impl fmt::Display for CaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaState::Open => write!(f, "Open"),
            CaState::Disorder => write!(f, "Disorder"),
            CaState::Cwr => write!(f, "CWR"),
            CaState::Recovery => write!(f, "Recovery"),
            CaState::Loss => write!(f, "Loss"),
        }
    }
}
