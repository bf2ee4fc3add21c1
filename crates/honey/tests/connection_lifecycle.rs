//! Whole-connection scenarios driven through the public API.

use honey::{
    CaState, CongestionControl, CongestionControlAlgorithm, CongestionControlConfig,
    CongestionController, HostConnection, SenderWindow,
};
use testresult::TestResult;

fn honey_connection(window: SenderWindow) -> HostConnection<CongestionController> {
    HostConnection::new(CongestionController::new(CongestionControlAlgorithm::Honey), window)
}

#[test_log::test]
fn slow_start_doubles_until_clamp() {
    let mut conn = honey_connection(SenderWindow::new(10, 1000));

    let mut seen = vec![conn.window().cwnd];
    for ack in 0..10 {
        let cwnd = conn.window().cwnd;
        conn.on_ack(ack, cwnd, 40_000);
        seen.push(conn.window().cwnd);
    }

    assert_eq!(&seen[..7], &[10, 20, 40, 80, 160, 320, 640]);
    // 320 + 320 > 500 at 640: jumps to 320 + 500, then creeps towards 1000.
    assert_eq!(seen[7], 820);
    assert!(seen.windows(2).all(|w| w[1] >= w[0] || w[0] > 1000));
    assert!(*seen.last().unwrap() <= 1002);
}

#[test_log::test]
fn loss_without_rtt_inflation_keeps_window() {
    let mut conn = honey_connection(SenderWindow::new(10, 10_000).with_ssthresh(64));
    for ack in 0..5 {
        conn.on_ack(ack, 10, 50_000);
    }
    let before = conn.window().cwnd;

    conn.on_loss();
    assert_eq!(conn.ca_state(), CaState::Recovery);
    assert_eq!(conn.window().ssthresh, before);
    assert_eq!(conn.window().cwnd, before);
}

#[test_log::test]
fn loss_with_rtt_inflation_shrinks_to_four_fifths() {
    let mut conn = honey_connection(SenderWindow::new(100, 10_000).with_ssthresh(50));
    conn.on_ack(1, 100, 50_000);
    conn.on_ack(2, 100, 150_000);
    assert_eq!(conn.window().cwnd, 102);

    let stats = conn.controller().stats();
    assert!(stats.congested);

    conn.on_loss();
    assert_eq!(conn.window().ssthresh, 81);
    assert_eq!(conn.window().cwnd, 81);
}

#[test_log::test]
fn recovery_falls_back_to_reno_and_reopens() {
    let mut conn = honey_connection(SenderWindow::new(40, 10_000).with_ssthresh(20));
    conn.on_ack(1, 40, 50_000);
    assert_eq!(conn.window().cwnd, 41);

    conn.enter_state(CaState::Disorder);
    let honey = conn.controller().as_honey().expect("honey controller");
    assert!(!honey.heuristic_enabled());

    // Reno additive increase: 41 segments acknowledged grow the window by one.
    conn.on_ack(2, 20, 50_000);
    assert_eq!(conn.window().cwnd, 41);
    conn.on_ack(3, 21, 50_000);
    assert_eq!(conn.window().cwnd, 42);

    conn.on_recovered();
    conn.on_ack(4, 1, 50_000);
    assert_eq!(conn.window().cwnd, 43);
}

#[test_log::test]
fn timeout_then_reno_slow_start() {
    let mut conn = honey_connection(SenderWindow::new(64, 10_000).with_ssthresh(32));
    conn.on_ack(1, 64, 50_000);
    conn.on_timeout();
    assert_eq!(conn.ca_state(), CaState::Loss);
    assert_eq!(conn.window().cwnd, 1);
    assert_eq!(conn.window().ssthresh, 65);

    // Still in Loss: Reno slow start grows by the acked count.
    conn.on_ack(2, 1, 50_000);
    assert_eq!(conn.window().cwnd, 2);

    // Back in Open: Honey doubles.
    conn.on_recovered();
    conn.on_ack(3, 2, 50_000);
    assert_eq!(conn.window().cwnd, 4);
}

#[test_log::test]
fn reno_and_honey_differ_only_in_policy() -> TestResult {
    let config = CongestionControlConfig::from_toml_str(
        r#"
        initial-cwnd = 10
        cwnd-clamp = 1000
        "#,
    )?;

    let mut honey = HostConnection::new(config.build(), config.initial_window());
    let reno_config = config.clone().with_algorithm(CongestionControlAlgorithm::Reno);
    let mut reno = HostConnection::new(reno_config.build(), reno_config.initial_window());

    for ack in 0..3 {
        honey.on_ack(ack, 1, 50_000);
        reno.on_ack(ack, 1, 50_000);
    }
    assert_eq!(honey.window().cwnd, 80);
    assert_eq!(reno.window().cwnd, 13);

    honey.on_loss();
    reno.on_loss();
    assert_eq!(honey.window().cwnd, 80);
    assert_eq!(reno.window().cwnd, 6);
    Ok(())
}
