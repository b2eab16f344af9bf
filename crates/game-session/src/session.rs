//! A single interactive game between a player and an opponent.
//!
//! [`Session`] owns the game, the computer opponent and the high-score
//! lists. Every inbound command returns the events it produced, in order,
//! or a [`SessionError`] without changing anything.

use crate::config::SessionConfig;
use crate::scores::{HighScores, Outcome, ScoreCounters, ScoreEntry};
use board_core::{Board, BoardPiece, Side, Square};
use board_engine::ai::Evaluate;
use board_engine::{
    Ai, Difficulty, Game, GameError, GameStatus, KindOf, MoveOf, MoveRecord, PieceOf, Submitted,
};
use thiserror::Error;

/// Who plays the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two players share the board.
    VsHuman,
    /// One player against the computer, which plays `ai_side`.
    VsComputer { ai_side: Side },
}

impl Mode {
    /// Returns the side the computer plays, if any.
    pub const fn ai_side(self) -> Option<Side> {
        match self {
            Mode::VsHuman => None,
            Mode::VsComputer { ai_side } => Some(ai_side),
        }
    }
}

/// Error type for session commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("the computer is thinking")]
    AiThinking,

    #[error("no piece is selected")]
    NothingSelected,

    #[error("the session has closed")]
    SessionClosed,
}

/// Something the user interface should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent<P: BoardPiece> {
    /// The board differs from the last one shown.
    BoardChanged { board: Board<P> },
    /// A piece was selected; its legal destinations should be highlighted.
    Selected { from: Square, destinations: Vec<Square> },
    /// A move was played.
    MoveMade { record: MoveRecord<P>, by_ai: bool },
    /// The other side is now to move.
    TurnChanged { side: Side },
    /// The side to move is in check.
    CheckDeclared { side: Side },
    /// A pawn reached the last rank and a piece must be chosen.
    PromotionRequested {
        from: Square,
        to: Square,
        choices: Vec<P::Kind>,
    },
    /// The game is over.
    GameEnded {
        status: GameStatus,
        winner: Option<Side>,
    },
    /// A suggested move for the side to move.
    HintSuggested { from: Square, to: Square },
    DifficultyChanged { difficulty: Difficulty },
}

/// Events of a session over rule set `R`.
pub type EventOf<R> = SessionEvent<PieceOf<R>>;

/// A game with its players, pacing-free.
///
/// The computer moves only when [`Session::play_ai_turn`] is called; the
/// [`actor`](crate::actor) adds the thinking delay and the move clock.
pub struct Session<R: Evaluate> {
    game: Game<R>,
    mode: Mode,
    ai: Ai,
    selected: Option<Square>,
    scores: HighScores,
    score_recorded: bool,
}

impl<R: Evaluate> Session<R> {
    pub fn new(rules: R, mode: Mode, ai: Ai, scores: HighScores) -> Self {
        Session {
            game: Game::new(rules),
            mode,
            ai,
            selected: None,
            scores,
            score_recorded: false,
        }
    }

    /// Creates a session with the configured opponent and score store.
    pub fn from_config(rules: R, mode: Mode, config: &SessionConfig) -> Self {
        let ai = Ai::new(config.difficulty).with_search_depth(config.ai.search_depth);
        Self::new(rules, mode, ai, HighScores::open(&config.scores_db))
    }

    /// Replaces the game, e.g. to start from a custom position.
    pub fn with_game(mut self, game: Game<R>) -> Self {
        self.game = game;
        self
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.ai.difficulty()
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Returns the high-score list of this session's game.
    pub fn high_scores(&self) -> Vec<ScoreEntry> {
        self.scores.top(self.game.rules().name())
    }

    /// Returns true if the computer should move now.
    pub fn is_ai_turn(&self) -> bool {
        self.mode.ai_side() == Some(self.game.side_to_move())
            && !self.game.is_over()
            && self.game.pending_promotion().is_none()
    }

    /// Returns true if a player may move now.
    pub fn is_human_turn(&self) -> bool {
        !self.game.is_over() && self.mode.ai_side() != Some(self.game.side_to_move())
    }

    /// Selects the piece on `square` and reports its legal destinations.
    ///
    /// An empty square or an opponent's piece clears the selection and
    /// reports no destinations.
    pub fn select_square(&mut self, square: Square) -> Result<Vec<EventOf<R>>, SessionError> {
        self.check_human_turn()?;
        let destinations = self.game.select(square)?.destinations();
        self.selected = (!destinations.is_empty()).then_some(square);
        Ok(vec![SessionEvent::Selected {
            from: square,
            destinations,
        }])
    }

    /// Handles a click on `square`: moves the selected piece there if that is
    /// legal, otherwise selects the square.
    pub fn click(&mut self, square: Square) -> Result<Vec<EventOf<R>>, SessionError> {
        self.check_human_turn()?;
        if let Some(from) = self.selected {
            if self.game.select(from)?.find(from, square).is_some() {
                return self.confirm_move(square);
            }
        }
        self.select_square(square)
    }

    /// Moves the selected piece to `to`.
    pub fn confirm_move(&mut self, to: Square) -> Result<Vec<EventOf<R>>, SessionError> {
        self.check_human_turn()?;
        let from = self.selected.ok_or(SessionError::NothingSelected)?;
        match self.game.submit(from, to)? {
            Submitted::Applied(record) => Ok(self.after_move(record, false)),
            Submitted::PromotionPending { from, to, choices } => {
                self.selected = None;
                Ok(vec![SessionEvent::PromotionRequested { from, to, choices }])
            }
        }
    }

    /// Completes a pending promotion.
    pub fn choose_promotion(&mut self, kind: KindOf<R>) -> Result<Vec<EventOf<R>>, SessionError> {
        let record = self.game.promote(kind)?;
        Ok(self.after_move(record, false))
    }

    /// Starts over in `mode`. Any pending computer move is dropped.
    pub fn new_game(&mut self, mode: Mode) -> Vec<EventOf<R>> {
        self.game.reset();
        self.mode = mode;
        self.selected = None;
        self.score_recorded = false;
        tracing::info!(game = self.game.rules().name(), ?mode, "new game");
        vec![
            SessionEvent::BoardChanged {
                board: self.game.board().clone(),
            },
            SessionEvent::TurnChanged {
                side: self.game.side_to_move(),
            },
        ]
    }

    /// Takes back moves.
    ///
    /// Against the computer this rewinds to the player's previous turn,
    /// taking back the computer's reply (and any capture chain) too. A
    /// pending promotion is simply cancelled.
    pub fn undo(&mut self) -> Result<Vec<EventOf<R>>, SessionError> {
        if self.game.cancel_promotion() {
            return Ok(vec![SessionEvent::BoardChanged {
                board: self.game.board().clone(),
            }]);
        }

        self.game.undo()?;
        self.selected = None;
        if let Some(ai_side) = self.mode.ai_side() {
            while self.game.side_to_move() == ai_side && self.game.move_count() > 0 {
                self.game.undo()?;
            }
        }

        let mut events = vec![
            SessionEvent::BoardChanged {
                board: self.game.board().clone(),
            },
            SessionEvent::TurnChanged {
                side: self.game.side_to_move(),
            },
        ];
        events.extend(self.continuation_selection());
        Ok(events)
    }

    /// Suggests a move for the side to move using the current difficulty.
    pub fn hint(&mut self) -> Result<Vec<EventOf<R>>, SessionError> {
        self.check_human_turn()?;
        let m = self
            .ai
            .select_move(self.game.rules(), self.game.position())
            .ok_or(GameError::GameAlreadyOver)?;
        Ok(vec![SessionEvent::HintSuggested {
            from: m.from,
            to: m.to,
        }])
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<EventOf<R>> {
        self.ai.set_difficulty(difficulty);
        vec![SessionEvent::DifficultyChanged { difficulty }]
    }

    pub fn cycle_difficulty(&mut self) -> Vec<EventOf<R>> {
        let difficulty = self.ai.cycle_difficulty();
        vec![SessionEvent::DifficultyChanged { difficulty }]
    }

    /// Resigns for the player: the human side against the computer,
    /// otherwise the side to move.
    pub fn resign(&mut self) -> Result<Vec<EventOf<R>>, SessionError> {
        let side = match self.mode.ai_side() {
            Some(ai_side) => ai_side.opposite(),
            None => self.game.side_to_move(),
        };
        self.selected = None;
        self.game.resign(side)?;
        Ok(self.game_ended())
    }

    /// Lets the computer play one move (one jump of a capture chain).
    pub fn play_ai_turn(&mut self) -> Result<Vec<EventOf<R>>, SessionError> {
        if !self.is_ai_turn() {
            return Err(SessionError::NotYourTurn);
        }
        let m = self
            .ai
            .select_move(self.game.rules(), self.game.position())
            .ok_or(GameError::GameAlreadyOver)?;
        tracing::debug!(difficulty = %self.ai.difficulty(), mv = %m, "computer move");
        self.play(&m, true)
    }

    /// Plays a random legal move for the player whose clock ran out.
    pub fn force_timeout_move(&mut self) -> Result<Vec<EventOf<R>>, SessionError> {
        self.check_not_over()?;
        if self.is_ai_turn() {
            return Err(SessionError::NotYourTurn);
        }
        self.game.cancel_promotion();
        self.selected = None;
        let m = self
            .ai
            .fallback_move(self.game.rules(), self.game.position())
            .ok_or(GameError::GameAlreadyOver)?;
        tracing::debug!(mv = %m, "move clock expired");
        self.play(&m, false)
    }

    fn play(&mut self, m: &MoveOf<R>, by_ai: bool) -> Result<Vec<EventOf<R>>, SessionError> {
        let record = self.game.make_move(m)?;
        Ok(self.after_move(record, by_ai))
    }

    fn after_move(&mut self, record: MoveRecord<PieceOf<R>>, by_ai: bool) -> Vec<EventOf<R>> {
        self.selected = None;
        let continues = record.continues;
        let mut events = vec![
            SessionEvent::MoveMade { record, by_ai },
            SessionEvent::BoardChanged {
                board: self.game.board().clone(),
            },
        ];

        if self.game.is_over() {
            events.extend(self.game_ended());
            return events;
        }
        let side = self.game.side_to_move();
        if !continues {
            events.push(SessionEvent::TurnChanged { side });
        }
        if let GameStatus::Check(side) = self.game.status() {
            events.push(SessionEvent::CheckDeclared { side });
        }
        events.extend(self.continuation_selection());
        events
    }

    /// Selects the piece that must keep capturing, if any.
    fn continuation_selection(&mut self) -> Option<EventOf<R>> {
        let from = self.game.continuation()?;
        if !self.is_human_turn() {
            return None;
        }
        let destinations = self.game.select(from).ok()?.destinations();
        self.selected = Some(from);
        Some(SessionEvent::Selected { from, destinations })
    }

    fn game_ended(&mut self) -> Vec<EventOf<R>> {
        let status = self.game.status();
        let winner = status.winner();
        tracing::info!(game = self.game.rules().name(), %status, "game over");
        self.record_score(status);
        vec![SessionEvent::GameEnded { status, winner }]
    }

    /// Adds the finished game to the high-score list, once per game.
    fn record_score(&mut self, status: GameStatus) {
        if self.score_recorded {
            return;
        }
        self.score_recorded = true;

        // Against the computer the player is scored; otherwise the winner,
        // or White for a draw.
        let scored = self
            .mode
            .ai_side()
            .map(Side::opposite)
            .or(status.winner())
            .unwrap_or(Side::White);
        let outcome = match status.winner() {
            Some(winner) if winner == scored => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Draw,
        };
        let counters = ScoreCounters {
            outcome,
            captures: self.game.capture_count(scored) as u32,
            plies: self.game.move_count() as u32,
        };
        let summary = format!("{} as {}: {}", self.game.rules().name(), scored, status);
        self.scores
            .record(self.game.rules().name(), &ScoreEntry::new(summary, counters));
    }

    fn check_not_over(&self) -> Result<(), SessionError> {
        if self.game.is_over() {
            Err(GameError::GameAlreadyOver.into())
        } else {
            Ok(())
        }
    }

    fn check_human_turn(&self) -> Result<(), SessionError> {
        self.check_not_over()?;
        if self.is_ai_turn() {
            Err(SessionError::NotYourTurn)
        } else {
            Ok(())
        }
    }
}
