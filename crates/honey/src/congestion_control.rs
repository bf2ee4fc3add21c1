//! Congestion control interface between a host transport and its strategies.
//!
//! A host keeps one strategy per connection and invokes its hooks at fixed
//! points of ACK processing. The hooks mirror the classic TCP congestion-ops
//! table:
//!
//! | Hook | When the host calls it |
//! |------|------------------------|
//! | [`init`](CongestionControl::init) | strategy activated on a connection |
//! | [`pkts_acked`](CongestionControl::pkts_acked) | packets acknowledged, optional RTT sample |
//! | [`set_state`](CongestionControl::set_state) | connection changes congestion phase |
//! | [`cong_avoid`](CongestionControl::cong_avoid) | once per eligible growth round |
//! | [`ssthresh`](CongestionControl::ssthresh) | loss or congestion signalled |
//!
//! ## Design
//!
//! All strategies are known at compile time, so selection is an enum
//! ([`CongestionController`]) rather than a registry of trait objects. The
//! trait is still public so hosts can be generic over a single strategy.
//!
//! ## Usage
//!
//! ```
//! use honey::{CongestionControl, CongestionControlConfig};
//!
//! let config = CongestionControlConfig::default();
//! let mut controller = config.build();
//! let mut window = config.initial_window();
//!
//! controller.pkts_acked(1, 50_000);
//! controller.cong_avoid(&mut window, 0, 1);
//! let ssthresh = controller.ssthresh(&window);
//! assert!(ssthresh >= 2);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::honey::{HoneyController, HoneyStats};
use crate::reno::{self, RenoController};
use crate::window::{CaState, SenderWindow, INFINITE_SSTHRESH, INITIAL_CWND, MIN_SSTHRESH};

// =============================================================================
// Algorithm Identification
// =============================================================================

/// Identifies the congestion control algorithm in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub enum CongestionControlAlgorithm {
    /// RTT-inflation heuristic with a Reno fallback outside the Open phase.
    #[default]
    Honey,
    /// Slow start plus additive increase, halving on loss.
    Reno,
}

impl fmt::Display for CongestionControlAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongestionControlAlgorithm::Honey => write!(f, "honey"),
            CongestionControlAlgorithm::Reno => write!(f, "reno"),
        }
    }
}

impl FromStr for CongestionControlAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "honey" => Ok(Self::Honey),
            "reno" => Ok(Self::Reno),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

impl TryFrom<String> for CongestionControlAlgorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CongestionControlAlgorithm> for String {
    fn from(value: CongestionControlAlgorithm) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Algorithm-Agnostic Statistics
// =============================================================================

/// Statistics common to every strategy.
///
/// For strategy-specific detail, match on [`CongestionController`] and ask the
/// inner controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CongestionControlStats {
    /// Algorithm identifier.
    pub algorithm: CongestionControlAlgorithm,
    /// Smallest RTT observed (microseconds), if the strategy tracks RTT.
    pub rtt_min_us: Option<u32>,
    /// Latest RTT observed (microseconds), if the strategy tracks RTT.
    pub rtt_latest_us: Option<u32>,
    /// Whether the strategy currently believes the path is congested.
    pub congested: bool,
    /// Growth rounds processed.
    pub rounds: u64,
}

// =============================================================================
// Congestion Control Trait
// =============================================================================

/// Hooks a host transport invokes on a per-connection strategy.
///
/// Hooks for one connection are never invoked concurrently, so they take
/// `&mut self` and need no internal synchronisation. Every hook is total:
/// there is no error path back to the host.
pub trait CongestionControl: Send {
    /// Reset to the initial state. Called once when the strategy is attached.
    fn init(&mut self);

    /// Packets were acknowledged.
    ///
    /// `rtt_us` is the RTT sample in microseconds; zero or negative means the
    /// host had no usable sample for this ACK.
    fn pkts_acked(&mut self, cnt: u32, rtt_us: i32);

    /// The connection entered `new_state`.
    fn set_state(&mut self, new_state: CaState);

    /// Grow the window for one ACK-processing round.
    ///
    /// `ack` is the acknowledged sequence marker and `acked` the number of
    /// newly acknowledged segments.
    fn cong_avoid(&mut self, window: &mut SenderWindow, ack: u32, acked: u32);

    /// New slow start threshold after loss or congestion. Must not mutate state.
    fn ssthresh(&self, window: &SenderWindow) -> u32;

    /// Window to restore when a reduction is undone.
    fn undo_cwnd(&self, window: &SenderWindow, prior_cwnd: u32) -> u32 {
        reno::undo_cwnd(window, prior_cwnd)
    }

    /// Stable identifier of the strategy.
    fn name(&self) -> &'static str;

    fn algorithm(&self) -> CongestionControlAlgorithm;

    fn stats(&self) -> CongestionControlStats;
}

// =============================================================================
// Congestion Controller Enum (Dispatch)
// =============================================================================

/// Strategy selected by configuration.
#[derive(Debug, Clone)]
pub enum CongestionController {
    Honey(HoneyController),
    Reno(RenoController),
}

impl CongestionController {
    pub fn new(algorithm: CongestionControlAlgorithm) -> Self {
        match algorithm {
            CongestionControlAlgorithm::Honey => Self::Honey(HoneyController::new()),
            CongestionControlAlgorithm::Reno => Self::Reno(RenoController::new()),
        }
    }

    /// Get a reference to the inner Honey controller if applicable.
    pub fn as_honey(&self) -> Option<&HoneyController> {
        match self {
            Self::Honey(c) => Some(c),
            Self::Reno(_) => None,
        }
    }

    /// Get a reference to the inner Reno controller if applicable.
    pub fn as_reno(&self) -> Option<&RenoController> {
        match self {
            Self::Honey(_) => None,
            Self::Reno(c) => Some(c),
        }
    }

    /// Honey-specific statistics, if this is a Honey controller.
    pub fn honey_stats(&self) -> Option<HoneyStats> {
        self.as_honey().map(HoneyController::stats)
    }
}

impl CongestionControl for CongestionController {
    fn init(&mut self) {
        match self {
            Self::Honey(c) => c.init(),
            Self::Reno(c) => c.init(),
        }
    }

    fn pkts_acked(&mut self, cnt: u32, rtt_us: i32) {
        match self {
            Self::Honey(c) => c.pkts_acked(cnt, rtt_us),
            Self::Reno(c) => c.pkts_acked(cnt, rtt_us),
        }
    }

    fn set_state(&mut self, new_state: CaState) {
        match self {
            Self::Honey(c) => c.set_state(new_state),
            Self::Reno(c) => c.set_state(new_state),
        }
    }

    fn cong_avoid(&mut self, window: &mut SenderWindow, ack: u32, acked: u32) {
        match self {
            Self::Honey(c) => c.cong_avoid(window, ack, acked),
            Self::Reno(c) => c.cong_avoid(window, ack, acked),
        }
    }

    fn ssthresh(&self, window: &SenderWindow) -> u32 {
        match self {
            Self::Honey(c) => c.ssthresh(window),
            Self::Reno(c) => c.ssthresh(window),
        }
    }

    fn undo_cwnd(&self, window: &SenderWindow, prior_cwnd: u32) -> u32 {
        match self {
            Self::Honey(c) => c.undo_cwnd(window, prior_cwnd),
            Self::Reno(c) => c.undo_cwnd(window, prior_cwnd),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Honey(c) => c.name(),
            Self::Reno(c) => c.name(),
        }
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        match self {
            Self::Honey(_) => CongestionControlAlgorithm::Honey,
            Self::Reno(_) => CongestionControlAlgorithm::Reno,
        }
    }

    fn stats(&self) -> CongestionControlStats {
        match self {
            Self::Honey(c) => CongestionControl::stats(c),
            Self::Reno(c) => CongestionControl::stats(c),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for creating congestion controllers and their initial window.
///
/// Deserializes from TOML with kebab-case keys; missing keys take defaults:
///
/// ```toml
/// algorithm = "honey"
/// initial-cwnd = 10
/// cwnd-clamp = 4294967295
/// initial-ssthresh = 2147483647
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CongestionControlConfig {
    /// Which algorithm to use.
    pub algorithm: CongestionControlAlgorithm,
    /// Initial congestion window (segments).
    pub initial_cwnd: u32,
    /// Largest window the connection may reach (segments).
    pub cwnd_clamp: u32,
    /// Initial slow start threshold (segments).
    pub initial_ssthresh: u32,
}

impl Default for CongestionControlConfig {
    fn default() -> Self {
        Self {
            algorithm: CongestionControlAlgorithm::Honey,
            initial_cwnd: INITIAL_CWND,
            cwnd_clamp: u32::MAX,
            initial_ssthresh: INFINITE_SSTHRESH,
        }
    }
}

impl CongestionControlConfig {
    /// Create a new configuration for the specified algorithm with defaults.
    pub fn new(algorithm: CongestionControlAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            algorithm = %config.algorithm,
            "Loaded congestion control config"
        );
        Ok(config)
    }

    pub fn with_algorithm(mut self, algorithm: CongestionControlAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_initial_cwnd(mut self, cwnd: u32) -> Self {
        self.initial_cwnd = cwnd;
        self
    }

    pub fn with_cwnd_clamp(mut self, clamp: u32) -> Self {
        self.cwnd_clamp = clamp;
        self
    }

    pub fn with_initial_ssthresh(mut self, ssthresh: u32) -> Self {
        self.initial_ssthresh = ssthresh;
        self
    }

    /// Check the window parameters are coherent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cwnd_clamp < MIN_SSTHRESH {
            return Err(ConfigError::InvalidWindow(format!(
                "cwnd-clamp must be at least {MIN_SSTHRESH}, got {}",
                self.cwnd_clamp
            )));
        }
        if self.initial_cwnd == 0 || self.initial_cwnd > self.cwnd_clamp {
            return Err(ConfigError::InvalidWindow(format!(
                "initial-cwnd must be within 1..={}, got {}",
                self.cwnd_clamp, self.initial_cwnd
            )));
        }
        if self.initial_ssthresh < MIN_SSTHRESH {
            return Err(ConfigError::InvalidWindow(format!(
                "initial-ssthresh must be at least {MIN_SSTHRESH}, got {}",
                self.initial_ssthresh
            )));
        }
        Ok(())
    }

    /// Build a controller for one connection, already in its initial state.
    pub fn build(&self) -> CongestionController {
        CongestionController::new(self.algorithm)
    }

    /// Host window a new connection starts with.
    pub fn initial_window(&self) -> SenderWindow {
        SenderWindow::new(self.initial_cwnd, self.cwnd_clamp).with_ssthresh(self.initial_ssthresh)
    }
}
