//! Reno growth rules and the standalone Reno strategy.

use crate::congestion_control::{
    CongestionControl, CongestionControlAlgorithm, CongestionControlStats,
};
use crate::window::{CaState, SenderWindow, MIN_SSTHRESH};

/// Slow start: grow `cwnd` by `acked`, stopping at `ssthresh`.
///
/// Returns the part of `acked` that was not consumed because the threshold
/// was reached, so the caller can credit it to congestion avoidance.
pub fn slow_start(window: &mut SenderWindow, acked: u32) -> u32 {
    if !window.in_slow_start() {
        return acked;
    }

    let cwnd = window.cwnd.saturating_add(acked).min(window.ssthresh);
    let leftover = acked.saturating_sub(cwnd - window.cwnd);
    window.cwnd = cwnd.min(window.cwnd_clamp);
    leftover
}

/// Additive increase: one segment of growth for every `w` segments acknowledged.
///
/// Credit accumulates in `cwnd_cnt` across calls. Bulk ACKs covering several
/// windows are credited all at once.
pub fn cong_avoid_ai(window: &mut SenderWindow, w: u32, acked: u32) {
    let w = w.max(1);

    // Credit left over from a window that has since shrunk.
    if window.cwnd_cnt >= w {
        window.cwnd_cnt = 0;
        window.cwnd = window.cwnd.saturating_add(1);
    }

    window.cwnd_cnt = window.cwnd_cnt.saturating_add(acked);
    if window.cwnd_cnt >= w {
        let delta = window.cwnd_cnt / w;
        window.cwnd_cnt -= delta * w;
        window.cwnd = window.cwnd.saturating_add(delta);
    }
    window.cwnd = window.cwnd.min(window.cwnd_clamp);
}

/// Reno window growth for one ACK-processing round.
pub fn cong_avoid(window: &mut SenderWindow, acked: u32) {
    if !window.cwnd_limited {
        return;
    }

    let mut acked = acked;
    if window.in_slow_start() {
        acked = slow_start(window, acked);
        if acked == 0 {
            return;
        }
    }
    let w = window.cwnd;
    cong_avoid_ai(window, w, acked);
}

/// Multiplicative decrease: half the window, never below two segments.
pub fn ssthresh(window: &SenderWindow) -> u32 {
    (window.cwnd >> 1).max(MIN_SSTHRESH)
}

/// Window to restore after a congestion event turned out to be spurious.
pub fn undo_cwnd(window: &SenderWindow, prior_cwnd: u32) -> u32 {
    window.cwnd.max(prior_cwnd)
}

/// Reno as a selectable strategy.
///
/// Ignores RTT samples and phase changes; growth is driven entirely by the
/// acknowledged segment count.
#[derive(Debug, Clone, Default)]
pub struct RenoController {
    rounds: u64,
}

impl RenoController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of growth rounds processed since `init`.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}

impl CongestionControl for RenoController {
    fn init(&mut self) {
        self.rounds = 0;
    }

    fn pkts_acked(&mut self, _cnt: u32, _rtt_us: i32) {}

    fn set_state(&mut self, _new_state: CaState) {}

    fn cong_avoid(&mut self, window: &mut SenderWindow, _ack: u32, acked: u32) {
        self.rounds = self.rounds.saturating_add(1);
        cong_avoid(window, acked);
    }

    fn ssthresh(&self, window: &SenderWindow) -> u32 {
        ssthresh(window)
    }

    fn name(&self) -> &'static str {
        "reno"
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        CongestionControlAlgorithm::Reno
    }

    fn stats(&self) -> CongestionControlStats {
        CongestionControlStats {
            algorithm: CongestionControlAlgorithm::Reno,
            rtt_min_us: None,
            rtt_latest_us: None,
            congested: false,
            rounds: self.rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_start_grows_by_acked() {
        let mut window = SenderWindow::new(10, 1000);
        let leftover = slow_start(&mut window, 5);
        assert_eq!(window.cwnd, 15);
        assert_eq!(leftover, 0);
    }

    #[test]
    fn test_slow_start_stops_at_ssthresh() {
        let mut window = SenderWindow::new(10, 1000).with_ssthresh(12);
        let leftover = slow_start(&mut window, 5);
        assert_eq!(window.cwnd, 12);
        assert_eq!(leftover, 3);
    }

    #[test]
    fn test_slow_start_respects_clamp() {
        let mut window = SenderWindow::new(10, 12);
        let leftover = slow_start(&mut window, 5);
        assert_eq!(window.cwnd, 12);
        assert_eq!(leftover, 0);
    }

    #[test]
    fn test_slow_start_is_noop_in_avoidance() {
        let mut window = SenderWindow::new(20, 1000).with_ssthresh(10);
        assert_eq!(slow_start(&mut window, 4), 4);
        assert_eq!(window.cwnd, 20);
    }

    #[test]
    fn test_additive_increase_one_segment_per_window() {
        let mut window = SenderWindow::new(10, 1000).with_ssthresh(5);
        for _ in 0..9 {
            cong_avoid(&mut window, 1);
            assert_eq!(window.cwnd, 10);
        }
        cong_avoid(&mut window, 1);
        assert_eq!(window.cwnd, 11);
        assert_eq!(window.cwnd_cnt, 0);
    }

    #[test]
    fn test_additive_increase_bulk_credit() {
        let mut window = SenderWindow::new(10, 1000).with_ssthresh(5);
        cong_avoid_ai(&mut window, 10, 25);
        assert_eq!(window.cwnd, 12);
        assert_eq!(window.cwnd_cnt, 5);
    }

    #[test]
    fn test_additive_increase_stale_credit() {
        let mut window = SenderWindow::new(4, 1000).with_ssthresh(2);
        window.cwnd_cnt = 8;
        cong_avoid_ai(&mut window, 4, 1);
        assert_eq!(window.cwnd, 5);
        assert_eq!(window.cwnd_cnt, 1);
    }

    #[test]
    fn test_additive_increase_zero_window() {
        let mut window = SenderWindow::new(0, 1000).with_ssthresh(0);
        cong_avoid_ai(&mut window, 0, 1);
        assert_eq!(window.cwnd, 1);
    }

    #[test]
    fn test_additive_increase_clamped() {
        let mut window = SenderWindow::new(10, 10).with_ssthresh(5);
        cong_avoid_ai(&mut window, 10, 30);
        assert_eq!(window.cwnd, 10);
    }

    #[test]
    fn test_slow_start_leftover_flows_into_avoidance() {
        let mut window = SenderWindow::new(10, 1000).with_ssthresh(12);
        cong_avoid(&mut window, 5);
        assert_eq!(window.cwnd, 12);
        assert_eq!(window.cwnd_cnt, 3);
    }

    #[test]
    fn test_application_limited_does_not_grow() {
        let mut window = SenderWindow::new(10, 1000);
        window.cwnd_limited = false;
        cong_avoid(&mut window, 10);
        assert_eq!(window.cwnd, 10);
    }

    #[test]
    fn test_ssthresh_halves_with_floor() {
        assert_eq!(ssthresh(&SenderWindow::new(100, 1000)), 50);
        assert_eq!(ssthresh(&SenderWindow::new(3, 1000)), 2);
        assert_eq!(ssthresh(&SenderWindow::new(0, 1000)), 2);
    }

    #[test]
    fn test_undo_takes_larger_window() {
        let window = SenderWindow::new(20, 1000);
        assert_eq!(undo_cwnd(&window, 40), 40);
        assert_eq!(undo_cwnd(&window, 10), 20);
    }

    #[test]
    fn test_controller_counts_rounds() {
        let mut controller = RenoController::new();
        controller.init();
        let mut window = SenderWindow::new(10, 1000);
        controller.cong_avoid(&mut window, 0, 10);
        controller.cong_avoid(&mut window, 0, 20);
        assert_eq!(window.cwnd, 40);
        assert_eq!(controller.rounds(), 2);
        assert_eq!(controller.stats().rounds, 2);
        assert_eq!(controller.name(), "reno");

        controller.init();
        assert_eq!(controller.rounds(), 0);
    }
}
