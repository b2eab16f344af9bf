//! Session task behaviour with paused tokio time.

use board_core::{Side, Square};
use board_engine::chess::StandardChess;
use board_engine::{Ai, Difficulty};
use game_session::config::ThinkDelays;
use game_session::{
    spawn, ActorConfig, EventOf, HighScores, Mode, Session, SessionError, SessionEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn session(mode: Mode, difficulty: Difficulty) -> Session<StandardChess> {
    Session::new(
        StandardChess,
        mode,
        Ai::with_seed(difficulty, 42),
        HighScores::in_memory(),
    )
}

fn vs_computer() -> Mode {
    Mode::VsComputer {
        ai_side: Side::Black,
    }
}

/// Waits for the next computer move, skipping other events.
async fn next_ai_move(events: &mut mpsc::Receiver<EventOf<StandardChess>>) {
    loop {
        let event = events.recv().await.expect("session is running");
        if matches!(event, SessionEvent::MoveMade { by_ai: true, .. }) {
            return;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn computer_replies_after_think_delay() {
    let (handle, mut events) = spawn(
        session(vs_computer(), Difficulty::Medium),
        ActorConfig::default(),
    );

    handle.select_square(sq("e2")).await.unwrap();
    handle.confirm_move(sq("e4")).await.unwrap();
    let start = Instant::now();

    next_ai_move(&mut events).await;
    assert!(start.elapsed() >= Duration::from_millis(1000));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.move_count, 2);
    assert_eq!(snapshot.side_to_move, Side::White);
    assert!(!snapshot.ai_thinking);
}

#[tokio::test(start_paused = true)]
async fn board_input_is_rejected_while_thinking() {
    let (handle, _events) = spawn(
        session(vs_computer(), Difficulty::Hard),
        ActorConfig::default(),
    );

    handle.select_square(sq("e2")).await.unwrap();
    handle.confirm_move(sq("e4")).await.unwrap();

    assert!(handle.snapshot().await.unwrap().ai_thinking);
    assert_eq!(
        handle.select_square(sq("d2")).await,
        Err(SessionError::AiThinking)
    );
    assert_eq!(handle.undo().await, Err(SessionError::AiThinking));
    assert_eq!(handle.hint().await, Err(SessionError::AiThinking));
    handle.set_difficulty(Difficulty::Easy).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn new_game_cancels_the_pending_move() {
    let (handle, mut events) = spawn(
        session(vs_computer(), Difficulty::Easy),
        ActorConfig::default(),
    );

    handle.select_square(sq("e2")).await.unwrap();
    handle.confirm_move(sq("e4")).await.unwrap();
    handle.new_game(vs_computer()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.move_count, 0);
    assert!(!snapshot.ai_thinking);
    while let Ok(event) = events.try_recv() {
        assert!(!matches!(event, SessionEvent::MoveMade { by_ai: true, .. }));
    }
}

#[tokio::test(start_paused = true)]
async fn computer_opens_when_playing_white() {
    let mode = Mode::VsComputer {
        ai_side: Side::White,
    };
    let (handle, mut events) = spawn(session(mode, Difficulty::Easy), ActorConfig::default());

    let start = Instant::now();
    next_ai_move(&mut events).await;
    assert!(start.elapsed() >= Duration::from_millis(500));
    assert_eq!(handle.snapshot().await.unwrap().side_to_move, Side::Black);
}

#[tokio::test(start_paused = true)]
async fn expired_clock_plays_for_the_player() {
    let config = ActorConfig {
        think_delays: ThinkDelays::none(),
        move_time_limit: Some(Duration::from_secs(30)),
    };
    let (handle, _events) = spawn(session(Mode::VsHuman, Difficulty::Easy), config);

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(handle.snapshot().await.unwrap().move_count, 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.move_count, 1);
    assert_eq!(snapshot.side_to_move, Side::Black);
}

#[tokio::test(start_paused = true)]
async fn rejected_input_changes_nothing() {
    let (handle, _events) = spawn(
        session(Mode::VsHuman, Difficulty::Easy),
        ActorConfig::default(),
    );

    assert_eq!(
        handle.confirm_move(sq("e4")).await,
        Err(SessionError::NothingSelected)
    );
    handle.select_square(sq("e2")).await.unwrap();
    assert!(handle.confirm_move(sq("e5")).await.is_err());

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.move_count, 0);
    assert_eq!(snapshot.selected, Some(sq("e2")));
}
