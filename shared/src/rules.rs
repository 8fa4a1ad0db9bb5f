//! Move resolution.
//!
//! Resolution is split in two: [`resolve_move`] performs every legality check
//! against a borrowed board and produces a [`ResolvedMove`], and
//! [`ResolvedMove::apply`] performs the mutation. A rejected move therefore
//! never touches the board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Player, Position, Unit, UnitId, UnitKind};
use crate::movement::{displacement, Direction};

/// How a move request names the unit to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitRef {
    /// By stable identifier.
    Id { id: UnitId },
    /// By the cell it currently stands on. Signed so that a coordinate off
    /// the board still parses and is rejected as `UnitNotFound`.
    At { row: i64, col: i64 },
    /// First unit of this type owned by the acting player, scanning row-major.
    Kind { name: UnitKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    #[serde(alias = "player")]
    pub acting_player: Player,
    pub unit: UnitRef,
    pub direction: Direction,
}

impl MoveRequest {
    pub fn new(acting_player: Player, unit: UnitRef, direction: impl Into<Direction>) -> Self {
        Self {
            acting_player,
            unit,
            direction: direction.into(),
        }
    }
}

/// Why a move was rejected. Serializes as the bare variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("it is not this player's turn")]
    WrongTurn,
    #[error("the referenced unit is not on the board for this player")]
    UnitNotFound,
    #[error("this unit cannot move in that direction")]
    NoDisplacementForDirection,
    #[error("the destination is outside the board")]
    OutOfBounds,
    #[error("the destination holds one of the player's own units")]
    FriendlyOccupied,
    #[error("the game is over")]
    GameOver,
}

impl MoveError {
    pub fn kind(self) -> &'static str {
        match self {
            MoveError::WrongTurn => "WrongTurn",
            MoveError::UnitNotFound => "UnitNotFound",
            MoveError::NoDisplacementForDirection => "NoDisplacementForDirection",
            MoveError::OutOfBounds => "OutOfBounds",
            MoveError::FriendlyOccupied => "FriendlyOccupied",
            MoveError::GameOver => "GameOver",
        }
    }
}

/// A move that passed every check and is ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub unit: Unit,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Unit>,
}

impl ResolvedMove {
    /// Relocates the unit and removes any captured opponent.
    ///
    /// Must be applied to the same board it was resolved against.
    pub fn apply(&self, board: &mut Board) {
        board.remove(self.from);
        if self.captured.is_some() {
            board.remove(self.to);
        }
        board.place(self.to, self.unit);
    }
}

/// Locates the unit a reference points to, if the acting player owns it.
pub fn locate_unit(board: &Board, owner: Player, unit_ref: UnitRef) -> Option<(Position, Unit)> {
    let found = match unit_ref {
        UnitRef::Id { id } => {
            let pos = board.position_of(id)?;
            board.get(pos).map(|unit| (pos, unit))
        }
        UnitRef::At { row, col } => {
            let pos = Position::new(usize::try_from(row).ok()?, usize::try_from(col).ok()?)?;
            board.get(pos).map(|unit| (pos, unit))
        }
        UnitRef::Kind { name } => board.find_unit(owner, |unit| unit.kind == name),
    };
    found.filter(|(_, unit)| unit.owner == owner)
}

/// Checks a request against the board and whose turn it is.
pub fn resolve_move(
    board: &Board,
    current_turn: Player,
    request: &MoveRequest,
) -> Result<ResolvedMove, MoveError> {
    let player = request.acting_player;
    if player != current_turn {
        return Err(MoveError::WrongTurn);
    }

    let (from, unit) = locate_unit(board, player, request.unit).ok_or(MoveError::UnitNotFound)?;

    let step =
        displacement(unit.kind, &request.direction).ok_or(MoveError::NoDisplacementForDirection)?;

    let to = from.offset(step).ok_or(MoveError::OutOfBounds)?;

    let captured = match board.get(to) {
        Some(occupant) if occupant.owner == player => return Err(MoveError::FriendlyOccupied),
        other => other,
    };

    Ok(ResolvedMove {
        unit,
        from,
        to,
        captured,
    })
}
