//! Tests for move submission and the CPU-response loop.

mod common;

use common::{CountingRefresher, ScriptedServer, drain, pos};
use othello_client::{
    CpuOutcome, MoveCoordinator, NoopObserver, ProtocolError, ProtocolErrorKind, SessionError,
    SessionEvent, Sentinels, TurnOutcome,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;

fn coordinator(max_passes: u32) -> MoveCoordinator {
    MoveCoordinator::new(Sentinels::default(), max_passes, Arc::new(NoopObserver))
}

#[tokio::test]
async fn test_rejected_move_stops_turn() {
    let server = ScriptedServer::new().with_play(Ok("0"));
    let refresher = CountingRefresher::default();

    let outcome = coordinator(60)
        .submit_move(&server, &refresher, pos(0, 0))
        .await
        .expect("rejection is not an error");

    assert_eq!(outcome, TurnOutcome::Rejected);
    assert_eq!(refresher.count(), 0);
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_accepted_move_refreshes_then_runs_cpu_once() {
    let server = ScriptedServer::new().with_play(Ok("3")).with_respond(&["4"]);
    let refresher = CountingRefresher::default();

    let outcome = coordinator(60)
        .submit_move(&server, &refresher, pos(2, 3))
        .await
        .expect("turn succeeds");

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            ack: "3".to_string(),
            cpu: CpuOutcome {
                passes: 0,
                ack: "4".to_string(),
            },
        }
    );
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 1);
    // One refresh for the move, one after the CPU answer
    assert_eq!(refresher.count(), 2);
}

#[tokio::test]
async fn test_pass_chain_refreshes_after_every_answer() {
    let server = ScriptedServer::new().with_respond(&["you pass", "you pass", "ack"]);
    let refresher = CountingRefresher::default();

    let outcome = coordinator(60)
        .run_cpu_loop(&server, &refresher)
        .await
        .expect("loop ends on ack");

    assert_eq!(outcome.passes, 2);
    assert_eq!(outcome.ack, "ack");
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 3);
    assert_eq!(refresher.count(), 3);
}

#[tokio::test]
async fn test_endless_passing_is_a_protocol_violation() {
    let server = ScriptedServer::new().always_passing();
    let refresher = CountingRefresher::default();

    let err = coordinator(5)
        .run_cpu_loop(&server, &refresher)
        .await
        .expect_err("loop must give up");

    assert_eq!(err.protocol_kind(), Some(ProtocolErrorKind::ProtocolViolation));
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 6);
    assert_eq!(refresher.count(), 5);
}

#[tokio::test]
async fn test_cpu_failure_aborts_loop() {
    let server = ScriptedServer::new()
        .with_respond(&["you pass"])
        .with_respond_error(ProtocolError::timeout("no answer"));
    let refresher = CountingRefresher::default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = MoveCoordinator::new(Sentinels::default(), 60, Arc::new(tx));

    let err = coordinator
        .run_cpu_loop(&server, &refresher)
        .await
        .expect_err("timeout is fatal to the loop");

    assert_eq!(err.protocol_kind(), Some(ProtocolErrorKind::Timeout));
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 2);
    assert_eq!(refresher.count(), 1);
    assert!(!coordinator.is_turn_pending());
    assert!(
        drain(&mut rx)
            .iter()
            .any(|event| matches!(event, SessionEvent::TurnFailed(_)))
    );
}

#[tokio::test]
async fn test_failed_submission_leaves_board_alone() {
    let server =
        ScriptedServer::new().with_play(Err(ProtocolError::network("connection refused")));
    let refresher = CountingRefresher::default();

    let err = coordinator(60)
        .submit_move(&server, &refresher, pos(5, 4))
        .await
        .expect_err("network failure is reported");

    assert!(matches!(err, SessionError::Protocol(_)));
    assert_eq!(err.protocol_kind(), Some(ProtocolErrorKind::NetworkFailure));
    assert_eq!(refresher.count(), 0);
    assert_eq!(server.respond_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_turn_events_in_order() {
    let server = ScriptedServer::new()
        .with_play(Ok("1"))
        .with_respond(&["you pass", "2"]);
    let refresher = CountingRefresher::default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = MoveCoordinator::new(Sentinels::default(), 60, Arc::new(tx));

    coordinator
        .submit_move(&server, &refresher, pos(4, 5))
        .await
        .expect("turn succeeds");

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert!(matches!(
        &events[0],
        SessionEvent::MoveAccepted { position, ack } if *position == pos(4, 5) && ack == "1"
    ));
    assert!(matches!(events[1], SessionEvent::CpuPassed { passes: 1 }));
    assert!(matches!(&events[2], SessionEvent::CpuMoved { ack } if ack == "2"));
}
