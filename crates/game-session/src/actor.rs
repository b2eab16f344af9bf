//! Async session runner.
//!
//! [`spawn`] moves a [`Session`] into a tokio task that owns it. Commands
//! arrive through a [`SessionHandle`]; events leave on an mpsc channel.
//! The task plays the computer's moves after a thinking delay and, when
//! the move clock is enabled, plays a random move for a player who runs
//! out of time.
//!
//! While the computer is thinking only new-game, difficulty and resign
//! commands are accepted. Board input is rejected with
//! [`SessionError::AiThinking`], and a new game drops the pending move.

use crate::config::{SessionConfig, ThinkDelays};
use crate::scores::ScoreEntry;
use crate::session::{EventOf, Mode, Session, SessionError, SessionEvent};
use board_core::{Board, BoardPiece, Side, Square};
use board_engine::ai::Evaluate;
use board_engine::{Difficulty, GameStatus, KindOf, PieceOf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

/// Pacing settings of the session task.
#[derive(Debug, Clone, Default)]
pub struct ActorConfig {
    pub think_delays: ThinkDelays,
    /// Time a player has for each move, if limited.
    pub move_time_limit: Option<Duration>,
}

impl From<&SessionConfig> for ActorConfig {
    fn from(config: &SessionConfig) -> Self {
        ActorConfig {
            think_delays: config.ai.think_delay_ms,
            move_time_limit: config.clock.limit(),
        }
    }
}

/// Player input forwarded to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Request<K> {
    SelectSquare(Square),
    Click(Square),
    ConfirmMove(Square),
    ChoosePromotion(K),
    NewGame(Mode),
    Undo,
    Hint,
    SetDifficulty(Difficulty),
    CycleDifficulty,
    Resign,
}

/// Read-only view of a running session.
#[derive(Debug, Clone)]
pub struct Snapshot<P: BoardPiece> {
    pub game: &'static str,
    pub board: Board<P>,
    pub status: GameStatus,
    pub side_to_move: Side,
    pub continuation: Option<Square>,
    pub selected: Option<Square>,
    pub pending_promotion: Option<(Square, Square)>,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub move_count: usize,
    pub ai_thinking: bool,
    pub high_scores: Vec<ScoreEntry>,
}

enum Command<R: Evaluate> {
    Input {
        request: Request<KindOf<R>>,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot<PieceOf<R>>>,
    },
}

/// Sends commands to a session task.
///
/// Every command waits for the task to process it. Once the task has
/// stopped all commands fail with [`SessionError::SessionClosed`].
pub struct SessionHandle<R: Evaluate> {
    tx: mpsc::Sender<Command<R>>,
}

impl<R: Evaluate> Clone for SessionHandle<R> {
    fn clone(&self) -> Self {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }
}

impl<R: Evaluate> SessionHandle<R> {
    /// Forwards a request and waits for it to be applied.
    pub async fn send(&self, request: Request<KindOf<R>>) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Input { request, reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub async fn select_square(&self, square: Square) -> Result<(), SessionError> {
        self.send(Request::SelectSquare(square)).await
    }

    pub async fn click(&self, square: Square) -> Result<(), SessionError> {
        self.send(Request::Click(square)).await
    }

    pub async fn confirm_move(&self, to: Square) -> Result<(), SessionError> {
        self.send(Request::ConfirmMove(to)).await
    }

    pub async fn choose_promotion(&self, kind: KindOf<R>) -> Result<(), SessionError> {
        self.send(Request::ChoosePromotion(kind)).await
    }

    pub async fn new_game(&self, mode: Mode) -> Result<(), SessionError> {
        self.send(Request::NewGame(mode)).await
    }

    pub async fn undo(&self) -> Result<(), SessionError> {
        self.send(Request::Undo).await
    }

    pub async fn hint(&self) -> Result<(), SessionError> {
        self.send(Request::Hint).await
    }

    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<(), SessionError> {
        self.send(Request::SetDifficulty(difficulty)).await
    }

    pub async fn cycle_difficulty(&self) -> Result<(), SessionError> {
        self.send(Request::CycleDifficulty).await
    }

    pub async fn resign(&self) -> Result<(), SessionError> {
        self.send(Request::Resign).await
    }

    /// Returns the current state of the session.
    pub async fn snapshot(&self) -> Result<Snapshot<PieceOf<R>>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }
}

/// Starts a task running `session`.
///
/// The task stops when every handle has been dropped.
pub fn spawn<R: Evaluate>(
    session: Session<R>,
    config: ActorConfig,
) -> (SessionHandle<R>, mpsc::Receiver<EventOf<R>>) {
    let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
    let (events, event_rx) = mpsc::channel(EVENT_BUFFER);
    let actor = SessionActor {
        session,
        config,
        events,
        ai_deadline: None,
        clock: None,
    };
    tokio::spawn(actor.run(commands));
    (SessionHandle { tx }, event_rx)
}

struct SessionActor<R: Evaluate> {
    session: Session<R>,
    config: ActorConfig,
    events: mpsc::Sender<EventOf<R>>,
    /// When the computer plays its pending move.
    ai_deadline: Option<Instant>,
    /// Ply the move clock was started for, and when it runs out.
    clock: Option<(usize, Instant)>,
}

impl<R: Evaluate> SessionActor<R> {
    async fn run(mut self, mut commands: mpsc::Receiver<Command<R>>) {
        tracing::debug!(game = self.session.game().rules().name(), "session started");
        loop {
            self.schedule();
            let clock_deadline = self.clock.map(|(_, deadline)| deadline);
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = wait_until(self.ai_deadline) => self.play_ai_turn().await,
                _ = wait_until(clock_deadline) => self.clock_expired().await,
            }
        }
        tracing::debug!("session closed");
    }

    /// Arms or disarms the computer's move and the player's clock.
    fn schedule(&mut self) {
        if self.session.is_ai_turn() {
            if self.ai_deadline.is_none() {
                let delay = self
                    .config
                    .think_delays
                    .for_difficulty(self.session.difficulty());
                self.ai_deadline = Some(Instant::now() + delay);
            }
        } else {
            self.ai_deadline = None;
        }

        match self.config.move_time_limit {
            Some(limit) if self.session.is_human_turn() => {
                let ply = self.session.game().move_count();
                if self.clock.map_or(true, |(started_at, _)| started_at != ply) {
                    self.clock = Some((ply, Instant::now() + limit));
                }
            }
            _ => self.clock = None,
        }
    }

    async fn handle(&mut self, command: Command<R>) {
        match command {
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Input { request, reply } => match self.apply(request) {
                Ok(events) => {
                    publish(&self.events, events).await;
                    let _ = reply.send(Ok(()));
                }
                Err(e) => {
                    tracing::debug!("rejected input: {}", e);
                    let _ = reply.send(Err(e));
                }
            },
        }
    }

    fn apply(&mut self, request: Request<KindOf<R>>) -> Result<Vec<EventOf<R>>, SessionError> {
        let thinking = self.ai_deadline.is_some();
        match request {
            Request::NewGame(mode) => {
                self.ai_deadline = None;
                self.clock = None;
                Ok(self.session.new_game(mode))
            }
            Request::SetDifficulty(difficulty) => Ok(self.session.set_difficulty(difficulty)),
            Request::CycleDifficulty => Ok(self.session.cycle_difficulty()),
            Request::Resign => self.session.resign(),
            _ if thinking => Err(SessionError::AiThinking),
            Request::SelectSquare(square) => self.session.select_square(square),
            Request::Click(square) => self.session.click(square),
            Request::ConfirmMove(to) => self.session.confirm_move(to),
            Request::ChoosePromotion(kind) => self.session.choose_promotion(kind),
            Request::Undo => self.session.undo(),
            Request::Hint => self.session.hint(),
        }
    }

    async fn play_ai_turn(&mut self) {
        self.ai_deadline = None;
        match self.session.play_ai_turn() {
            Ok(events) => publish(&self.events, events).await,
            Err(e) => tracing::warn!("computer could not move: {}", e),
        }
    }

    async fn clock_expired(&mut self) {
        self.clock = None;
        match self.session.force_timeout_move() {
            Ok(events) => publish(&self.events, events).await,
            Err(e) => tracing::warn!("no move for expired clock: {}", e),
        }
    }

    fn snapshot(&self) -> Snapshot<PieceOf<R>> {
        let game = self.session.game();
        Snapshot {
            game: game.rules().name(),
            board: game.board().clone(),
            status: game.status(),
            side_to_move: game.side_to_move(),
            continuation: game.continuation(),
            selected: self.session.selected(),
            pending_promotion: game.pending_promotion(),
            difficulty: self.session.difficulty(),
            mode: self.session.mode(),
            move_count: game.move_count(),
            ai_thinking: self.ai_deadline.is_some(),
            high_scores: self.session.high_scores(),
        }
    }
}

/// Forwards events to the listener, if there still is one.
async fn publish<P: BoardPiece>(tx: &mpsc::Sender<SessionEvent<P>>, events: Vec<SessionEvent<P>>) {
    for event in events {
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
