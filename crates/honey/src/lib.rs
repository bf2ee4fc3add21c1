//! Honey: an RTT-inflation congestion control strategy for TCP-like transports.
//!
//! The crate provides the strategy side of a transport's congestion control.
//! A host transport owns each connection's [`SenderWindow`], measures RTTs and
//! detects loss; it calls the [`CongestionControl`] hooks and applies what
//! they decide.
//!
//! Two strategies are available:
//!
//! - **Honey** ([`HoneyController`]): infers congestion from RTT inflation
//!   (latest RTT above twice the observed floor), doubles in slow start, adds
//!   one segment per round otherwise, and only backs off to 80% on loss when
//!   the RTT says the path was congested. Outside the Open phase it defers to
//!   Reno.
//! - **Reno** ([`RenoController`]): the classic baseline.
//!
//! [`HostConnection`] is a small I/O-free host that calls the hooks in TCP
//! order, useful for simulation and testing.

pub mod congestion_control;
pub mod errors;
pub mod honey;
pub mod host;
pub mod reno;
pub mod window;

pub use congestion_control::{
    CongestionControl, CongestionControlAlgorithm, CongestionControlConfig,
    CongestionControlStats, CongestionController,
};
pub use errors::ConfigError;
pub use honey::{HoneyController, HoneyStats};
pub use host::HostConnection;
pub use reno::RenoController;
pub use window::{CaState, SenderWindow, INFINITE_SSTHRESH, INITIAL_CWND, MIN_SSTHRESH};
