use log::{debug, info};
use shared::{
    build_board, default_board, resolve_move, GameState, GameStatus, MoveError, MoveOutcome,
    MoveRequest, Player, Setup, SetupError,
};

/// The authoritative game.
///
/// Holds the only mutable [`GameState`]. `initialize` and `apply_move` are the
/// only operations that change it, and both take `&mut self`, so whoever owns
/// the session is the single point at which mutations are serialized.
#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    games_started: u32,
}

impl GameSession {
    /// Creates a session already set up with the default layout.
    pub fn new() -> Self {
        Self {
            state: GameState::new(default_board()),
            games_started: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    /// Replaces the current game with a fresh one. On error the current game
    /// is kept.
    pub fn initialize(&mut self, setup: &Setup) -> Result<&GameState, SetupError> {
        let board = build_board(setup)?;
        self.state = GameState::new(board);
        self.games_started += 1;

        info!(
            "Game {} started with {} units ({} for A, {} for B)",
            self.games_started,
            self.state.board().len(),
            self.state.board().count_units(Player::A),
            self.state.board().count_units(Player::B),
        );
        Ok(&self.state)
    }

    /// Validates and applies one move as a single step.
    ///
    /// Either every check passes and the board, turn and status are updated
    /// together, or an error is returned and nothing changes.
    pub fn apply_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, MoveError> {
        self.state.ensure_in_progress()?;
        let resolved = resolve_move(self.state.board(), self.state.current_turn(), request)?;
        let outcome = self.state.commit(&resolved);

        match outcome.captured {
            Some(captured) => info!(
                "{} moved {} -> {}, capturing {}",
                outcome.unit, outcome.from, outcome.to, captured
            ),
            None => debug!("{} moved {} -> {}", outcome.unit, outcome.from, outcome.to),
        }
        if let GameStatus::Won(winner) = outcome.status {
            info!("Player {} wins game {}", winner, self.games_started);
        }

        Ok(outcome)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
