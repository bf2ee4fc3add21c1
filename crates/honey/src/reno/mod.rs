//! Reno congestion control.
//!
//! Classic slow start followed by additive increase: the window grows by the
//! number of acknowledged segments until it reaches `ssthresh`, then by one
//! segment per window's worth of acknowledgments. On congestion the threshold
//! is halved.
//!
//! Besides being selectable on its own, the growth rule here is the baseline
//! other strategies fall back to when their own heuristic does not apply
//! (see [`crate::honey`]).

mod controller;

pub use controller::{cong_avoid, cong_avoid_ai, slow_start, ssthresh, undo_cwnd, RenoController};
