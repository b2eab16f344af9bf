//! Play chess or checkers in the terminal.
//!
//! Reads commands from stdin and prints the board and game events. See
//! `help` at the prompt for the command list.

mod input;

use board_core::{BoardPiece, PieceKind, Side};
use board_engine::ai::Evaluate;
use board_engine::checkers::Checkers;
use board_engine::chess::{ChessKind, StandardChess};
use board_engine::{Difficulty, KindOf};
use clap::{Parser, ValueEnum};
use game_session::{
    spawn, ActorConfig, Mode, Session, SessionConfig, SessionEvent, Snapshot,
};
use input::{Input, HELP};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    Chess,
    Checkers,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

/// Play chess or checkers against a friend or the computer.
#[derive(Parser)]
#[command(name = "play-terminal")]
#[command(about = "Play chess or checkers in the terminal")]
struct Args {
    /// Configuration file (defaults to games.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game to play
    #[arg(long, value_enum, default_value = "chess")]
    game: GameKind,

    /// Play against the computer instead of a second player
    #[arg(long)]
    vs_computer: bool,

    /// Side the computer plays (white is red in checkers)
    #[arg(long, value_enum, default_value = "black")]
    ai_side: SideArg,

    /// Computer difficulty: easy, medium or hard (overrides the config file)
    #[arg(long)]
    difficulty: Option<Difficulty>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load_from(path)?,
        None => SessionConfig::load()?,
    };
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    let mode = if args.vs_computer {
        Mode::VsComputer {
            ai_side: args.ai_side.into(),
        }
    } else {
        Mode::VsHuman
    };
    tracing::info!("Scores database: {:?}", config.scores_db);

    match args.game {
        GameKind::Chess => run(StandardChess, mode, &config, ChessKind::from_promotion_char).await,
        GameKind::Checkers => run(Checkers, mode, &config, |_| None).await,
    }
}

/// Runs one session until the player quits or stdin closes.
async fn run<R: Evaluate>(
    rules: R,
    mode: Mode,
    config: &SessionConfig,
    promotion_kind: fn(char) -> Option<KindOf<R>>,
) -> anyhow::Result<()> {
    let game = rules.name();
    let session = Session::from_config(rules, mode, config);
    let (handle, mut events) = spawn(session, ActorConfig::from(config));

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(game, &event);
        }
    });

    println!("{HELP}");
    print_snapshot(&handle.snapshot().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match input::parse(&line) {
            Ok(input) => input,
            Err(input::InputError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let result = match input {
            Input::Square(square) => handle.click(square).await,
            Input::Move(from, to) => match handle.select_square(from).await {
                Ok(()) => handle.confirm_move(to).await,
                Err(e) => Err(e),
            },
            Input::Promote(c) => match promotion_kind(c) {
                Some(kind) => handle.choose_promotion(kind).await,
                None => {
                    println!("cannot promote to '{c}'");
                    continue;
                }
            },
            Input::Undo => handle.undo().await,
            Input::Hint => handle.hint().await,
            Input::NewGame => {
                let mode = handle.snapshot().await?.mode;
                handle.new_game(mode).await
            }
            Input::Difficulty(Some(difficulty)) => handle.set_difficulty(difficulty).await,
            Input::Difficulty(None) => handle.cycle_difficulty().await,
            Input::Resign => handle.resign().await,
            Input::Scores => {
                print_scores(&handle.snapshot().await?);
                continue;
            }
            Input::Board => {
                print_snapshot(&handle.snapshot().await?);
                continue;
            }
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Quit => break,
        };
        if let Err(e) = result {
            println!("{e}");
        }
    }

    drop(handle);
    printer.await?;
    Ok(())
}

/// Checkers calls the first player red.
fn side_name(game: &str, side: Side) -> &'static str {
    match (game, side) {
        ("checkers", Side::White) => "Red",
        (_, Side::White) => "White",
        (_, Side::Black) => "Black",
    }
}

fn print_event<P: BoardPiece>(game: &str, event: &SessionEvent<P>) {
    match event {
        SessionEvent::BoardChanged { board } => println!("\n{board}\n"),
        SessionEvent::Selected { from, destinations } if destinations.is_empty() => {
            println!("{from}: no moves")
        }
        SessionEvent::Selected { from, destinations } => {
            let targets: Vec<String> = destinations.iter().map(|s| s.to_string()).collect();
            println!("{from} -> {}", targets.join(" "));
        }
        SessionEvent::MoveMade { record, by_ai } => {
            let who = if *by_ai { "computer" } else { side_name(game, record.side) };
            println!("{who} plays {}", record.mov);
        }
        SessionEvent::TurnChanged { side } => println!("{} to move", side_name(game, *side)),
        SessionEvent::CheckDeclared { side } => println!("{} is in check", side_name(game, *side)),
        SessionEvent::PromotionRequested { choices, .. } => {
            let letters: String = choices.iter().map(|k| k.symbol()).collect();
            println!("promote to one of [{letters}] with 'promote <letter>'");
        }
        SessionEvent::GameEnded { status, winner } => match winner {
            Some(side) => println!("game over: {} wins ({status})", side_name(game, *side)),
            None => println!("game over: {status}"),
        },
        SessionEvent::HintSuggested { from, to } => println!("hint: {from} {to}"),
        SessionEvent::DifficultyChanged { difficulty } => println!("difficulty: {difficulty}"),
    }
}

fn print_snapshot<P: BoardPiece>(snapshot: &Snapshot<P>) {
    println!("\n{}\n", snapshot.board);
    let mode = match snapshot.mode.ai_side() {
        Some(side) => format!("computer plays {}", side_name(snapshot.game, side)),
        None => "two players".to_string(),
    };
    println!(
        "{}: {}, {mode}, difficulty {}",
        snapshot.game,
        snapshot.status,
        snapshot.difficulty
    );
    if let Some(square) = snapshot.continuation {
        println!("the piece on {square} must keep capturing");
    }
}

fn print_scores<P: BoardPiece>(snapshot: &Snapshot<P>) {
    if snapshot.high_scores.is_empty() {
        println!("no high scores yet");
        return;
    }
    for (rank, entry) in snapshot.high_scores.iter().enumerate() {
        println!(
            "{:>2}. {:>4}  {}  ({})",
            rank + 1,
            entry.score,
            entry.summary,
            entry.recorded_at.format("%Y-%m-%d %H:%M")
        );
    }
}
