//! Play command - interactive session on stdin/stdout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_session() - input loop
//! - Level 3: parse_command(), apply_command()
//! - Level 4: rendering

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use rand::Rng;

use tilemerge_core::{Direction, Game, GameConfig, GameStatus, WIN_VALUE};

const HELP: &str = "\
Keys (one per line): up/down/left/right, arrow names or u/d/l/r
  restart  start a new game
  quit     leave";

// ============================================================================
// SESSION TYPES
// ============================================================================

/// One input line, interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Restart,
    Quit,
    Ignored,
}

/// Totals reported when the session ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub moves: u32,
    pub restarts: u32,
    pub status: GameStatus,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(config: &GameConfig) -> Result<()> {
    let mut game = Game::new(config.create_rng());

    tracing::info!(seed = ?config.seed, "Starting interactive session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = play_session(&mut game, stdin.lock(), stdout.lock(), config)?;

    tracing::info!(
        moves = summary.moves,
        restarts = summary.restarts,
        status = ?summary.status,
        "Session ended"
    );

    Ok(())
}

// ============================================================================
// LEVEL 2 - INPUT LOOP
// ============================================================================

/// Read keys until quit, end of input, or a win with `stop_on_win`
pub fn play_session<R, I, W>(
    game: &mut Game<R>,
    input: I,
    mut output: W,
    config: &GameConfig,
) -> Result<SessionSummary>
where
    R: Rng,
    I: BufRead,
    W: Write,
{
    if config.show_help {
        writeln!(output, "{HELP}")?;
    }
    render(&mut output, game)?;

    let mut restarts = 0;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;

        match parse_command(&line) {
            Command::Quit => break,
            Command::Ignored => {
                tracing::debug!(key = line.trim(), "Ignoring unrecognized key");
            }
            Command::Restart => {
                game.restart();
                restarts += 1;
                render(&mut output, game)?;
            }
            Command::Move(direction) => {
                let outcome = game.step(direction);
                if !outcome.changed {
                    continue;
                }

                render(&mut output, game)?;
                match outcome.status {
                    GameStatus::Won => {
                        writeln!(output, "You got {WIN_VALUE}!")?;
                        if config.stop_on_win {
                            break;
                        }
                    }
                    GameStatus::Lost => writeln!(output, "Game Over!")?,
                    GameStatus::Ongoing => {}
                }
            }
        }
    }

    output.flush()?;

    Ok(SessionSummary {
        moves: game.moves(),
        restarts,
        status: game.status(),
    })
}

// ============================================================================
// LEVEL 3 - COMMANDS
// ============================================================================

fn parse_command(line: &str) -> Command {
    let key = line.trim();
    match key.to_ascii_lowercase().as_str() {
        "restart" | "return" | "enter" => Command::Restart,
        "q" | "quit" | "exit" => Command::Quit,
        _ => match Direction::from_key(key) {
            Some(direction) => Command::Move(direction),
            None => Command::Ignored,
        },
    }
}

// ============================================================================
// LEVEL 4 - RENDERING
// ============================================================================

fn render<R: Rng, W: Write>(output: &mut W, game: &Game<R>) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "{}", game.board())?;
    writeln!(output, "moves: {}", game.moves())
}

// ============================================================================
// TESTS
// ============================================================================
