//! Minimal host transport driving a strategy through its hooks.
//!
//! [`HostConnection`] owns the per-connection [`SenderWindow`], the current
//! [`CaState`] and one strategy. It does no I/O: callers report ACKs, losses
//! and timeouts, and the connection invokes the strategy hooks in the order a
//! TCP sender does. Used by the simulator and by tests that exercise whole
//! connection lifetimes.

use crate::congestion_control::CongestionControl;
use crate::window::{CaState, SenderWindow};

/// A connection as seen by its congestion strategy.
#[derive(Debug)]
pub struct HostConnection<C> {
    window: SenderWindow,
    ca_state: CaState,
    controller: C,
    /// Window before the last reduction, for undo.
    prior_cwnd: u32,
}

impl<C: CongestionControl> HostConnection<C> {
    /// Attach `controller` to a new connection. Calls `init` exactly once.
    pub fn new(mut controller: C, window: SenderWindow) -> Self {
        controller.init();
        Self {
            window,
            ca_state: CaState::Open,
            controller,
            prior_cwnd: window.cwnd,
        }
    }

    pub fn window(&self) -> &SenderWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut SenderWindow {
        &mut self.window
    }

    pub fn ca_state(&self) -> CaState {
        self.ca_state
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Process an ACK covering `acked` new segments.
    ///
    /// The RTT sample is always delivered. Growth is skipped while the
    /// connection is reducing its window (Recovery, CWR) or when nothing new
    /// was acknowledged.
    pub fn on_ack(&mut self, ack: u32, acked: u32, rtt_us: i32) {
        self.controller.pkts_acked(acked, rtt_us);

        if acked == 0 || self.ca_state.is_reducing() {
            return;
        }
        self.controller.cong_avoid(&mut self.window, ack, acked);
    }

    /// Move to `new_state`, notifying the strategy on actual changes.
    pub fn enter_state(&mut self, new_state: CaState) {
        if new_state == self.ca_state {
            return;
        }
        self.controller.set_state(new_state);
        tracing::trace!(
            from = %self.ca_state,
            to = %new_state,
            cwnd = self.window.cwnd,
            "Congestion phase change"
        );
        self.ca_state = new_state;
    }

    /// Fast-retransmit style loss: enter Recovery and shrink to the strategy's threshold.
    pub fn on_loss(&mut self) {
        if self.ca_state.is_reducing() {
            return;
        }
        self.prior_cwnd = self.window.cwnd;
        self.enter_state(CaState::Recovery);
        self.reduce();
        self.window.cwnd = self.window.ssthresh.min(self.window.cwnd_clamp);
    }

    /// Retransmission timeout: enter Loss and restart from a single segment.
    pub fn on_timeout(&mut self) {
        self.prior_cwnd = self.window.cwnd;
        self.enter_state(CaState::Loss);
        self.reduce();
        self.window.cwnd = 1;
    }

    /// Loss handling finished; resume normal operation.
    pub fn on_recovered(&mut self) {
        self.enter_state(CaState::Open);
    }

    /// The last reduction was spurious: restore the window and reopen.
    pub fn undo(&mut self) {
        let restored = self.controller.undo_cwnd(&self.window, self.prior_cwnd);
        self.window.cwnd = restored.min(self.window.cwnd_clamp);
        self.enter_state(CaState::Open);
    }

    fn reduce(&mut self) {
        self.window.ssthresh = self.controller.ssthresh(&self.window);
        self.window.cwnd_cnt = 0;
        tracing::debug!(
            strategy = self.controller.name(),
            state = %self.ca_state,
            prior_cwnd = self.prior_cwnd,
            ssthresh = self.window.ssthresh,
            "Window reduction"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::honey::HoneyController;
    use crate::reno::RenoController;

    #[test]
    fn test_new_connection_is_open() {
        let conn = HostConnection::new(HoneyController::new(), SenderWindow::new(10, 1000));
        assert_eq!(conn.ca_state(), CaState::Open);
        assert!(conn.controller().heuristic_enabled());
    }

    #[test]
    fn test_ack_grows_window() {
        let mut conn = HostConnection::new(RenoController::new(), SenderWindow::new(10, 1000));
        conn.on_ack(1, 10, 50_000);
        assert_eq!(conn.window().cwnd, 20);
    }

    #[test]
    fn test_duplicate_ack_does_not_grow() {
        let mut conn = HostConnection::new(RenoController::new(), SenderWindow::new(10, 1000));
        conn.on_ack(1, 0, 50_000);
        assert_eq!(conn.window().cwnd, 10);
        assert_eq!(conn.controller().rounds(), 0);
    }

    #[test]
    fn test_loss_with_reno_halves() {
        let mut conn = HostConnection::new(RenoController::new(), SenderWindow::new(40, 1000));
        conn.on_loss();
        assert_eq!(conn.ca_state(), CaState::Recovery);
        assert_eq!(conn.window().ssthresh, 20);
        assert_eq!(conn.window().cwnd, 20);

        // No growth during recovery.
        conn.on_ack(2, 5, 50_000);
        assert_eq!(conn.window().cwnd, 20);

        // A second loss inside the same recovery is ignored.
        conn.on_loss();
        assert_eq!(conn.window().cwnd, 20);
    }

    #[test]
    fn test_timeout_restarts_from_one_segment() {
        let mut conn = HostConnection::new(RenoController::new(), SenderWindow::new(40, 1000));
        conn.on_timeout();
        assert_eq!(conn.ca_state(), CaState::Loss);
        assert_eq!(conn.window().cwnd, 1);
        assert_eq!(conn.window().ssthresh, 20);
    }

    #[test]
    fn test_undo_restores_prior_window() {
        let mut conn = HostConnection::new(RenoController::new(), SenderWindow::new(40, 1000));
        conn.on_loss();
        conn.undo();
        assert_eq!(conn.window().cwnd, 40);
        assert_eq!(conn.ca_state(), CaState::Open);
    }

    #[test]
    fn test_phase_changes_reach_strategy() {
        let mut conn = HostConnection::new(HoneyController::new(), SenderWindow::new(10, 1000));
        conn.enter_state(CaState::Disorder);
        assert!(!conn.controller().heuristic_enabled());
        conn.on_recovered();
        assert!(conn.controller().heuristic_enabled());
    }
}
