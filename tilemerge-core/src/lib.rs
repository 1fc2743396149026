//! TILEMERGE Core - tile-merging puzzle engine
//!
//! This crate provides the core game logic:
//! - Board grid, directions and the slide/merge transform
//! - Tile spawning with an injectable random source
//! - Win and game-over detection
//! - Game sessions tying moves, spawns and status together
//! - JSON session configuration

pub mod board;
pub mod config;
pub mod error;
pub mod game;

// Re-exports for convenient access
pub use board::{merge_line, Board, Direction, Line, Spawn, BOARD_SIZE, MAX_TILE, SPAWN_VALUES, WIN_VALUE};
pub use config::GameConfig;
pub use error::{BoardError, ConfigError, ParseDirectionError};
pub use game::{Game, GameStatus, MoveOutcome};
