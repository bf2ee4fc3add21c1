//! Honey tuning constants.
//!
//! None of these are configurable; they are part of the algorithm's definition.

/// RTT assumed before the first valid sample arrives (1 second, in microseconds).
///
/// Seeding both the floor and the latest sample with the same value keeps the
/// estimator at "not congested" until real samples come in.
pub const HONEY_INIT_RTT_US: u32 = 1_000_000;

/// Latest RTT must exceed this multiple of the RTT floor to count as congestion.
pub const CONGESTION_RTT_RATIO: u64 = 2;

/// Fraction of the window kept after a congestion loss (4/5).
pub const SHRINK_NUMERATOR: u64 = 4;
pub const SHRINK_DENOMINATOR: u64 = 5;
