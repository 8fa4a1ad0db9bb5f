//! Performance benchmarks for the rules engine and wire format

use shared::{
    build_board, resolve_move, GameState, MoveRequest, Player, ServerMessage, Setup, UnitRef,
};
use std::time::Instant;

/// Benchmarks move validation on a full opening board
#[test]
fn benchmark_resolve_move() {
    let board = build_board(&Setup::sample()).unwrap();
    let requests = [
        MoveRequest::new(Player::A, UnitRef::At { row: 0, col: 0 }, "Backward"),
        MoveRequest::new(Player::A, UnitRef::At { row: 0, col: 0 }, "Left"),
        MoveRequest::new(Player::A, UnitRef::At { row: 0, col: 3 }, "BackwardLeft"),
        MoveRequest::new(Player::B, UnitRef::At { row: 4, col: 0 }, "Forward"),
    ];

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = resolve_move(&board, Player::A, &requests[i % requests.len()]);
    }

    let duration = start.elapsed();
    println!(
        "Move resolution: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks laying out a fresh board from rosters
#[test]
fn benchmark_build_board() {
    let setup = Setup::sample();
    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let board = build_board(&setup).unwrap();
        assert_eq!(board.len(), 10);
    }

    let duration = start.elapsed();
    println!(
        "Board setup: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks encoding and decoding the full state broadcast
#[test]
fn benchmark_state_update_encoding() {
    let state = GameState::new(build_board(&Setup::sample()).unwrap());
    let message = ServerMessage::state_update(&state);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let text = message.to_json().unwrap();
        let decoded = ServerMessage::from_json(&text).unwrap();
        assert_eq!(decoded, message);
    }

    let duration = start.elapsed();
    println!(
        "State update encode+decode: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Generous bound for debug builds
    assert!(duration.as_millis() < 5000);
}
