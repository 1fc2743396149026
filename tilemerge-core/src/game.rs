//! Game session: a board, its random source and the move/spawn/status cycle

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Spawn};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game status after a move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    /// The target tile is on the board (takes precedence over `Lost`)
    Won,
    /// Board full with no merge left
    Lost,
}

impl GameStatus {
    pub fn is_ongoing(self) -> bool {
        self == GameStatus::Ongoing
    }
}

/// What one call to [`Game::step`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub direction: Direction,
    pub changed: bool,
    pub spawned: Option<Spawn>,
    pub status: GameStatus,
}

// ============================================================================
// GAME
// ============================================================================

/// A single-player session.
///
/// The random source is injected so tests and replays can seed it.
#[derive(Clone, Debug)]
pub struct Game<R = ChaCha8Rng> {
    board: Board,
    rng: R,
    /// Changed moves since the last (re)start
    moves: u32,
}

impl Game<ChaCha8Rng> {
    /// New game with a seeded ChaCha8 generator
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// New game seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with two random tiles
    pub fn new(rng: R) -> Self {
        let mut game = Self::with_board(Board::EMPTY, rng);
        game.initialize();
        game
    }

    /// Resume from an existing position; no tiles are added
    pub fn with_board(board: Board, rng: R) -> Self {
        Self {
            board,
            rng,
            moves: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_value(&self, row: usize, col: usize) -> u32 {
        self.board.cell_value(row, col)
    }

    /// Changed moves since the last (re)start
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn has_won(&self) -> bool {
        self.board.has_won()
    }

    pub fn status(&self) -> GameStatus {
        if self.board.has_won() {
            GameStatus::Won
        } else if self.board.is_game_over() {
            GameStatus::Lost
        } else {
            GameStatus::Ongoing
        }
    }

    // ========================================================================
    // STATE TRANSITIONS
    // ========================================================================

    /// Clear the board and place two fresh tiles
    pub fn initialize(&mut self) {
        self.board.initialize(&mut self.rng);
        self.moves = 0;
        tracing::debug!(tiles = self.board.tile_count(), "Board initialized");
    }

    /// Start over; identical to [`Game::initialize`]
    pub fn restart(&mut self) {
        tracing::debug!(moves = self.moves, max_tile = self.board.max_tile(), "Restarting game");
        self.initialize();
    }

    /// Slide and merge without spawning
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        self.board.apply_move(direction)
    }

    /// Add one random tile; `None` when the board is full
    pub fn spawn_tile(&mut self) -> Option<Spawn> {
        let spawn = self.board.spawn_tile(&mut self.rng);
        if let Some(s) = spawn {
            tracing::debug!(row = s.row, col = s.col, value = s.value, "Spawned tile");
        }
        spawn
    }

    /// One full turn: move, spawn if anything changed, report status
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        let changed = self.apply_move(direction);

        let spawned = if changed {
            self.moves += 1;
            self.spawn_tile()
        } else {
            None
        };

        MoveOutcome {
            direction,
            changed,
            spawned,
            status: self.status(),
        }
    }

    /// Turn a raw key symbol into a step; unknown keys do nothing
    pub fn handle_key(&mut self, key: &str) -> Option<MoveOutcome> {
        let direction = Direction::from_key(key)?;
        Some(self.step(direction))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_SIZE, WIN_VALUE};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    fn corner_game() -> Game {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        Game::with_board(board, rng())
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        let game = Game::from_seed(1);
        assert_eq!(game.board().tile_count(), 2);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Game::from_seed(42);
        let mut b = Game::from_seed(42);
        assert_eq!(a.board(), b.board());

        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            assert_eq!(a.step(direction), b.step(direction));
        }
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_noop_step_does_not_spawn() {
        let mut game = corner_game();
        let before = *game.board();

        let outcome = game.step(Direction::Left);
        assert!(!outcome.changed);
        assert_eq!(outcome.spawned, None);
        assert_eq!(game.moves(), 0);
        assert_eq!(*game.board(), before);
    }

    #[test]
    fn test_changed_step_spawns() {
        let mut game = corner_game();

        let outcome = game.step(Direction::Right);
        assert!(outcome.changed);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.cell_value(0, 3), 2);

        let spawn = outcome.spawned.unwrap();
        assert_eq!(game.cell_value(spawn.row, spawn.col), spawn.value);
        assert_eq!(game.board().tile_count(), 2);
    }

    #[test]
    fn test_handle_key() {
        let mut game = corner_game();
        let before = *game.board();

        assert_eq!(game.handle_key("space"), None);
        assert_eq!(game.handle_key("Escape"), None);
        assert_eq!(*game.board(), before);

        let outcome = game.handle_key("Down").unwrap();
        assert_eq!(outcome.direction, Direction::Down);
        assert!(outcome.changed);
        assert_eq!(game.cell_value(BOARD_SIZE - 1, 0), 2);
    }

    #[test]
    fn test_restart_resets() {
        let mut game = Game::from_seed(9);
        for direction in Direction::ALL.iter().cycle().take(20) {
            game.step(*direction);
        }
        assert!(game.moves() > 0);

        game.restart();
        assert_eq!(game.moves(), 0);
        assert_eq!(game.board().tile_count(), 2);
    }

    #[test]
    fn test_step_reports_win() {
        let board = Board::from_rows([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut game = Game::with_board(board, rng());

        let outcome = game.step(Direction::Left);
        assert_eq!(outcome.status, GameStatus::Won);
        assert_eq!(game.cell_value(0, 0), WIN_VALUE);
        assert!(game.has_won());
    }

    #[test]
    fn test_step_reports_loss() {
        // The spawn lands on the freed corner and cannot match its 16 neighbours
        let board = Board::from_rows([
            [8, 16, 8, 16],
            [16, 8, 16, 8],
            [8, 16, 8, 16],
            [0, 16, 8, 16],
        ]);
        let mut game = Game::with_board(board, rng());

        let outcome = game.step(Direction::Left);
        assert!(outcome.changed);
        assert_eq!(outcome.spawned.map(|s| (s.row, s.col)), Some((3, 3)));
        assert_eq!(outcome.status, GameStatus::Lost);

        let stuck = *game.board();
        for direction in Direction::ALL {
            let outcome = game.step(direction);
            assert!(!outcome.changed);
            assert_eq!(outcome.spawned, None);
        }
        assert_eq!(*game.board(), stuck);
    }

    #[test]
    fn test_status_loss_and_win_precedence() {
        let lost = Board::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        let game = Game::with_board(lost, rng());
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(game.is_game_over());
        assert!(!game.status().is_ongoing());

        let mut rows = *lost.rows();
        rows[0][0] = WIN_VALUE;
        let game = Game::with_board(Board::from_rows(rows), rng());
        assert!(game.is_game_over());
        assert_eq!(game.status(), GameStatus::Won);
    }
}
