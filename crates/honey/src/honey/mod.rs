//! Honey congestion controller.
//!
//! A minimal RTT-inflation strategy: the controller remembers the smallest RTT
//! seen on the connection and treats the path as congested whenever the latest
//! RTT is more than twice that floor.
//!
//! ## Behaviour
//!
//! | Situation | Growth per round | Shrink target |
//! |-----------|------------------|---------------|
//! | Open, slow start | double (`inc = cwnd`) | - |
//! | Open, avoidance | one segment | - |
//! | Any other phase | Reno baseline | - |
//! | Loss while congested | - | `max(cwnd * 4/5, 2)` |
//! | Loss while not congested | - | `max(cwnd, 2)` |
//!
//! The congestion estimate is only refreshed during growth rounds in the Open
//! phase. A shrink request reads whatever the last round concluded.
//!
//! ## Overflow
//!
//! Growth is clamped with a halves-summed comparison,
//! `cwnd/2 + inc/2 > clamp/2`, so the check itself cannot overflow a `u32`.
//! Once tripped, the window jumps to `cwnd/2 + clamp/2`, which closes in on the
//! clamp over successive rounds.

mod config;
mod controller;
mod stats;


pub use config::{
    CONGESTION_RTT_RATIO, HONEY_INIT_RTT_US, SHRINK_DENOMINATOR, SHRINK_NUMERATOR,
};
pub use controller::HoneyController;
pub use stats::HoneyStats;
