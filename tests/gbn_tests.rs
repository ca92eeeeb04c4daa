//! Integration tests for the Go-Back-N session loops.
//!
//! Each test runs a complete simulated session over loopback via the
//! in-process driver: receiver spawned as a background task, sender driven
//! to completion, both reports joined and asserted on. Loss patterns are
//! scripted (or seeded) so every scenario replays exactly.

use std::time::Duration;

use gbn_over_udp::driver::{run_simulation, SimReport};
use gbn_over_udp::loss::{NoLoss, RandomLoss, ScriptedLoss};
use gbn_over_udp::session::SenderConfig;

fn config(total: u64, window: u64, timeout_ms: u64) -> SenderConfig {
    SenderConfig {
        total_frames: total,
        window_size: window,
        timeout: Duration::from_millis(timeout_ms),
        ack_poll_interval: Duration::from_millis(20),
    }
}

/// Cumulative ACKs must never regress within a session.
fn assert_acks_monotonic(acks: &[u64]) {
    for pair in acks.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "ACK sequence regressed: {acks:?}"
        );
    }
}

fn assert_delivered_in_order(report: &SimReport, total: u64) {
    let expected: Vec<u64> = (0..total).collect();
    assert_eq!(
        report.receiver.delivered, expected,
        "receiver must deliver every frame exactly once, in order"
    );
}

// ---------------------------------------------------------------------------
// Test 1: lossless session — no retransmissions at all
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lossless_session_no_retransmissions() {
    let report = run_simulation(config(6, 3, 1000), Box::new(NoLoss), Box::new(NoLoss))
        .await
        .expect("simulation");

    assert_delivered_in_order(&report, 6);

    // Six frames, six attempts, nothing suppressed, no timeouts.
    assert_eq!(report.sender.frame_attempts, 6);
    assert_eq!(report.sender.suppressed, 0);
    assert_eq!(report.sender.timeout_rounds, 0);
    assert_eq!(report.sender.stale_acks, 0);

    // One cumulative ACK per frame, ending at 6.
    assert_eq!(report.sender.acks, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(report.receiver.ack_attempts, 6);
    assert_eq!(report.receiver.discarded, 0);
}

// ---------------------------------------------------------------------------
// Test 2: one lost frame — whole-window retransmission recovers it
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dropped_frame_recovered_by_window_retransmission() {
    // Attempts are numbered in transmission order, so attempt 2 is frame 2's
    // first send. Frames 0,1,3 go through; 3 arrives out of order.
    let frame_loss = ScriptedLoss::drop_attempts(&[2]);

    let report = run_simulation(config(4, 4, 400), Box::new(frame_loss), Box::new(NoLoss))
        .await
        .expect("simulation");

    assert_delivered_in_order(&report, 4);

    // Fill sends 0,1,2,3 (2 suppressed); the timeout resends window [2, 4).
    assert_eq!(report.sender.frame_attempts, 6);
    assert_eq!(report.sender.suppressed, 1);
    assert_eq!(report.sender.timeout_rounds, 1);

    // Frame 3 arrived while 2 was still missing and was discarded; its
    // arrival still produced the duplicate cumulative ACK:2.
    assert_eq!(report.receiver.discarded, 1);
    assert_eq!(report.receiver.ack_attempts, 5);
    assert_eq!(report.sender.acks, vec![1, 2, 2, 3, 4]);
    assert_acks_monotonic(&report.sender.acks);
}

// ---------------------------------------------------------------------------
// Test 3: lost ACK — the next cumulative ACK covers it, no retransmission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dropped_ack_masked_by_cumulative_successor() {
    // The receiver's first ACK (ACK:1) is dropped; ACK:2 acknowledges both
    // outstanding frames at once, so the window never stalls to timeout.
    let ack_loss = ScriptedLoss::drop_attempts(&[0]);

    let report = run_simulation(config(3, 2, 2000), Box::new(NoLoss), Box::new(ack_loss))
        .await
        .expect("simulation");

    assert_delivered_in_order(&report, 3);
    assert_eq!(report.sender.frame_attempts, 3);
    assert_eq!(report.sender.timeout_rounds, 0);
    assert_eq!(report.sender.acks, vec![2, 3]);
    assert_eq!(report.receiver.acks_suppressed, 1);
}

// ---------------------------------------------------------------------------
// Test 4: window of one degenerates to stop-and-wait
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stop_and_wait_window_of_one() {
    let report = run_simulation(config(5, 1, 1000), Box::new(NoLoss), Box::new(NoLoss))
        .await
        .expect("simulation");

    assert_delivered_in_order(&report, 5);

    // With N = 1 each frame waits for its own ACK: five sends, five ACKs,
    // one outstanding frame at a time.
    assert_eq!(report.sender.frame_attempts, 5);
    assert_eq!(report.sender.timeout_rounds, 0);
    assert_eq!(report.sender.acks, vec![1, 2, 3, 4, 5]);
}

// ---------------------------------------------------------------------------
// Test 5: seeded random loss on frames — session still completes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_frame_loss_completes() {
    let frame_loss = RandomLoss::with_seed(0.3, 7);

    let report = run_simulation(config(20, 4, 100), Box::new(frame_loss), Box::new(NoLoss))
        .await
        .expect("simulation");

    assert_delivered_in_order(&report, 20);
    assert_acks_monotonic(&report.sender.acks);
    assert_eq!(*report.sender.acks.last().expect("at least one ACK"), 20);

    // Every frame had to reach the receiver at least once, so at least 20
    // attempts survived the loss model.
    assert!(
        report.sender.frame_attempts - report.sender.suppressed >= 20,
        "delivered attempts must cover every frame at least once"
    );
}

// ---------------------------------------------------------------------------
// Test 6: loss in both directions — cumulative ACKs still converge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bidirectional_loss_completes() {
    let frame_loss = RandomLoss::with_seed(0.25, 41);
    let ack_loss = RandomLoss::with_seed(0.25, 42);

    let report = run_simulation(
        config(10, 3, 100),
        Box::new(frame_loss),
        Box::new(ack_loss),
    )
    .await
    .expect("simulation");

    assert_delivered_in_order(&report, 10);
    assert_acks_monotonic(&report.sender.acks);

    // Retransmissions of already-delivered frames are discarded as
    // duplicates and re-ACKed; none of that may corrupt delivery order.
    let delivered = report.receiver.delivered.len() as u64;
    assert_eq!(delivered, 10);
}
