//! Turn order and win detection.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Position, Unit};
use crate::rules::{MoveError, ResolvedMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner")]
pub enum GameStatus {
    InProgress,
    Won(Player),
}

/// What an accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub unit: Unit,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Unit>,
    pub status: GameStatus,
}

/// Board, whose turn it is, and whether the game has been won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_turn: Player,
    status: GameStatus,
}

impl GameState {
    /// A fresh game on `board`, player A to move.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            current_turn: Player::A,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose move it is
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// Returns whether the game is still running or who won it
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the winner once the game is over
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Won(player) => Some(player),
            GameStatus::InProgress => None,
        }
    }

    /// `Won` is terminal: every move is refused until the game is reset.
    pub fn ensure_in_progress(&self) -> Result<(), MoveError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::Won(_) => Err(MoveError::GameOver),
        }
    }

    /// Applies a resolved move and advances the turn state machine.
    ///
    /// If the mover's opponent has no units left the game becomes
    /// `Won(mover)` and the turn does not change; otherwise the turn passes to
    /// the opponent.
    pub fn commit(&mut self, resolved: &ResolvedMove) -> MoveOutcome {
        let mover = resolved.unit.owner;
        resolved.apply(&mut self.board);

        if self.board.count_units(mover.opponent()) == 0 {
            self.status = GameStatus::Won(mover);
        } else {
            self.current_turn = mover.opponent();
        }

        MoveOutcome {
            unit: resolved.unit,
            from: resolved.from,
            to: resolved.to,
            captured: resolved.captured,
            status: self.status,
        }
    }
}
