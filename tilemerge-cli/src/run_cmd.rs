//! Run command - apply a scripted move sequence
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: parse_moves(), create_game(), play_script(), report_results()
//! - Level 3: print_text_results(), print_json_results()
//! - Level 4: formatting utilities

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;

use tilemerge_core::{Board, Direction, Game, GameConfig, GameStatus, MoveOutcome};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Moves as letters (e.g. "LLUR") or comma/space separated names
    #[arg(long)]
    pub moves: String,

    /// Starting board, rows separated by '/' (default: two random tiles)
    #[arg(long, value_name = "BOARD")]
    pub board: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated run results
#[derive(Clone, Debug)]
struct RunResults {
    initial_board: Board,
    steps: Vec<MoveOutcome>,
    final_board: Board,
    status: GameStatus,
    moves: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the scripted command
///
/// 1. Parse the move script
/// 2. Set up the game
/// 3. Play the script
/// 4. Report results
pub fn run(args: RunArgs, config: &GameConfig) -> Result<()> {
    let directions = parse_moves(&args.moves)?;
    let mut game = create_game(args.board.as_deref(), config)?;

    tracing::info!(moves = directions.len(), seed = ?config.seed, "Running move script");

    let results = play_script(&mut game, &directions, config);

    tracing::info!(
        applied = results.steps.len(),
        status = ?results.status,
        "Script finished"
    );

    let stdout = io::stdout();
    report_results(&results, args.json, stdout.lock())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Parse a move script.
///
/// Tokens are split on commas and whitespace. A token naming a direction is
/// taken whole; anything else is read one letter at a time (`"LLUR"`).
fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    let mut directions = Vec::new();

    for token in script.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        if let Ok(direction) = token.parse::<Direction>() {
            directions.push(direction);
            continue;
        }

        for letter in token.chars() {
            let direction = letter
                .to_string()
                .parse::<Direction>()
                .with_context(|| format!("Invalid move {letter:?} in {token:?}"))?;
            directions.push(direction);
        }
    }

    if directions.is_empty() {
        anyhow::bail!("Move script is empty");
    }

    Ok(directions)
}

/// Start from the given board, or a fresh one with two random tiles
fn create_game(board: Option<&str>, config: &GameConfig) -> Result<Game> {
    let rng = config.create_rng();

    match board {
        Some(text) => {
            let board: Board = text
                .parse()
                .with_context(|| format!("Invalid board: {text}"))?;
            Ok(Game::with_board(board, rng))
        }
        None => Ok(Game::new(rng)),
    }
}

/// Apply moves in order, stopping at a loss (or a win with `stop_on_win`)
fn play_script<R: Rng>(game: &mut Game<R>, directions: &[Direction], config: &GameConfig) -> RunResults {
    let initial_board = *game.board();
    let mut steps = Vec::with_capacity(directions.len());

    for &direction in directions {
        let outcome = game.step(direction);
        steps.push(outcome);

        match outcome.status {
            GameStatus::Lost => break,
            GameStatus::Won if config.stop_on_win => break,
            _ => {}
        }
    }

    RunResults {
        initial_board,
        steps,
        final_board: *game.board(),
        status: game.status(),
        moves: game.moves(),
    }
}

/// Report run results
fn report_results<W: Write>(results: &RunResults, json: bool, output: W) -> Result<()> {
    if json {
        print_json_results(results, output)
    } else {
        print_text_results(results, output)
    }
}

// ============================================================================
// LEVEL 3 - REPORTING
// ============================================================================

fn print_text_results<W: Write>(results: &RunResults, mut output: W) -> Result<()> {
    writeln!(output, "Initial board:")?;
    writeln!(output, "{}", results.initial_board)?;
    writeln!(output)?;

    for (i, step) in results.steps.iter().enumerate() {
        writeln!(output, "{:>4}. {}", i + 1, format_step(step))?;
    }

    writeln!(output)?;
    writeln!(output, "Final board:")?;
    writeln!(output, "{}", results.final_board)?;
    writeln!(output, "Moves: {}  Status: {:?}", results.moves, results.status)?;

    Ok(())
}

fn print_json_results<W: Write>(results: &RunResults, mut output: W) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        initial_board: &'a Board,
        steps: &'a [MoveOutcome],
        final_board: &'a Board,
        status: GameStatus,
        moves: u32,
    }

    let json = JsonOutput {
        initial_board: &results.initial_board,
        steps: &results.steps,
        final_board: &results.final_board,
        status: results.status,
        moves: results.moves,
    };

    serde_json::to_writer_pretty(&mut output, &json)?;
    writeln!(output)?;

    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn format_step(step: &MoveOutcome) -> String {
    let spawn = match step.spawned {
        Some(s) => format!("spawn {} at ({}, {})", s.value, s.row, s.col),
        None => "no change".to_string(),
    };

    format!("{} {:<5}  {:<20}  {:?}", step.direction.letter(), step.direction, spawn, step.status)
}

// ============================================================================
// TESTS
// ============================================================================
