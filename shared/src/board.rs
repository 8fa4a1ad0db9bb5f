//! Board and unit model.
//!
//! The board is a fixed 5×5 grid. Each cell holds at most one unit, and every
//! unit carries a stable [`UnitId`] assigned when it was placed. The board keeps
//! a position index alongside the cells so a unit can be located by id without
//! scanning the grid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::movement::Displacement;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 5;

/// One of the two players of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Both players, A first
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    /// Returns the other player
    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "A"),
            Player::B => write!(f, "B"),
        }
    }
}

/// Unit type. Determines how a unit moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Pawn,
    Hero1,
    Hero2,
}

impl UnitKind {
    /// Type name as used on the wire (`Pawn`, `Hero1`, `Hero2`)
    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Pawn => "Pawn",
            UnitKind::Hero1 => "Hero1",
            UnitKind::Hero2 => "Hero2",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable identifier of a unit, assigned at placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit on the board. Its position is not stored here; it is wherever the
/// board holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "UnitRecord", from = "UnitRecord")]
pub struct Unit {
    pub id: UnitId,
    pub owner: Player,
    pub kind: UnitKind,
}

impl Unit {
    /// Creates a unit with the given identity, owner and type
    pub fn new(id: UnitId, owner: Player, kind: UnitKind) -> Self {
        Self { id, owner, kind }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}({})", self.kind, self.id, self.owner)
    }
}

/// Wire shape of a unit: `{ id, name, owner, type }`.
#[derive(Serialize, Deserialize)]
struct UnitRecord {
    id: UnitId,
    #[serde(default)]
    name: String,
    owner: Player,
    #[serde(rename = "type")]
    kind: UnitKind,
}

impl From<Unit> for UnitRecord {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.kind.name().to_string(),
            owner: unit.owner,
            kind: unit.kind,
        }
    }
}

impl From<UnitRecord> for Unit {
    fn from(record: UnitRecord) -> Self {
        Unit::new(record.id, record.owner, record.kind)
    }
}

/// A cell address, always inside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Returns `None` when the address falls outside the grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Self { row, col })
    }

    /// Row index, 0 at player A's home row
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index, 0 on the left
    pub fn col(self) -> usize {
        self.col
    }

    /// Applies a displacement, returning `None` if the destination is off the board.
    pub fn offset(self, displacement: Displacement) -> Option<Self> {
        let row = self.row as i32 + displacement.rows;
        let col = self.col as i32 + displacement.cols;
        if row < 0 || col < 0 {
            return None;
        }
        Position::new(row as usize, col as usize)
    }

    /// All 25 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board must be {size}x{size}", size = BOARD_SIZE)]
    WrongShape,
    #[error("unit {0} appears more than once")]
    DuplicateUnit(UnitId),
}

type BoardCells = Vec<Vec<Option<Unit>>>;

/// The 5×5 grid.
///
/// Invariants: at most one unit per cell, and each [`UnitId`] appears in at most
/// one cell. The position index always mirrors the cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardCells", try_from = "BoardCells")]
pub struct Board {
    cells: [[Option<Unit>; BOARD_SIZE]; BOARD_SIZE],
    index: HashMap<UnitId, Position>,
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            index: HashMap::new(),
        }
    }

    /// Returns the unit on a cell, if any
    pub fn get(&self, pos: Position) -> Option<Unit> {
        self.cells[pos.row][pos.col]
    }

    /// Puts `unit` at `pos`, overwriting whatever was there.
    ///
    /// No legality checks are made. If the same unit id was already on the
    /// board elsewhere, that cell is cleared so the id stays unique.
    pub fn place(&mut self, pos: Position, unit: Unit) {
        if let Some(previous) = self.index.remove(&unit.id) {
            self.cells[previous.row][previous.col] = None;
        }
        if let Some(displaced) = self.cells[pos.row][pos.col].take() {
            self.index.remove(&displaced.id);
        }
        self.cells[pos.row][pos.col] = Some(unit);
        self.index.insert(unit.id, pos);
    }

    /// Clears a cell, returning its former occupant.
    pub fn remove(&mut self, pos: Position) -> Option<Unit> {
        let unit = self.cells[pos.row][pos.col].take()?;
        self.index.remove(&unit.id);
        Some(unit)
    }

    /// Looks up where a unit currently stands
    pub fn position_of(&self, id: UnitId) -> Option<Position> {
        self.index.get(&id).copied()
    }

    /// Scans in row-major order for the first unit of `owner` matching `predicate`.
    pub fn find_unit<F>(&self, owner: Player, predicate: F) -> Option<(Position, Unit)>
    where
        F: Fn(&Unit) -> bool,
    {
        self.units().find(|(_, unit)| unit.owner == owner && predicate(unit))
    }

    /// Every unit on the board with its position, in row-major order.
    pub fn units(&self) -> impl Iterator<Item = (Position, Unit)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|unit| (pos, unit)))
    }

    /// Returns the number of units `owner` has left on the board
    pub fn count_units(&self, owner: Player) -> usize {
        self.units().filter(|(_, unit)| unit.owner == owner).count()
    }

    /// Returns the total number of units on the board
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no units are on the board
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn rebuild_index(&mut self) -> Result<(), BoardError> {
        self.index.clear();
        for pos in Position::all() {
            if let Some(unit) = self.get(pos) {
                if self.index.insert(unit.id, pos).is_some() {
                    return Err(BoardError::DuplicateUnit(unit.id));
                }
            }
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for BoardCells {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<BoardCells> for Board {
    type Error = BoardError;

    fn try_from(rows: BoardCells) -> Result<Self, Self::Error> {
        if rows.len() != BOARD_SIZE || rows.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(BoardError::WrongShape);
        }

        let mut board = Board::new();
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                board.cells[r][c] = cell;
            }
        }
        board.rebuild_index()?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn pawn(id: u32, owner: Player) -> Unit {
        Unit::new(UnitId(id), owner, UnitKind::Pawn)
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(4, 4).is_some());
        assert!(Position::new(5, 0).is_none());
        assert!(Position::new(0, 5).is_none());
    }

    #[test]
    fn test_position_offset() {
        let origin = pos(0, 0);
        assert_eq!(origin.offset(Displacement::new(1, 0)), Some(pos(1, 0)));
        assert_eq!(origin.offset(Displacement::new(0, -1)), None);
        assert_eq!(pos(4, 4).offset(Displacement::new(2, 2)), None);
        assert_eq!(pos(2, 2).offset(Displacement::new(-2, 2)), Some(pos(0, 4)));
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::A.opponent(), Player::B);
        assert_eq!(Player::B.opponent(), Player::A);
    }

    #[test]
    fn test_place_and_lookup() {
        let mut board = Board::new();
        let unit = pawn(1, Player::A);
        board.place(pos(2, 3), unit);

        assert_eq!(board.get(pos(2, 3)), Some(unit));
        assert_eq!(board.position_of(UnitId(1)), Some(pos(2, 3)));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_place_overwrites_occupant() {
        let mut board = Board::new();
        board.place(pos(1, 1), pawn(1, Player::A));
        board.place(pos(1, 1), pawn(2, Player::B));

        assert_eq!(board.get(pos(1, 1)).map(|u| u.id), Some(UnitId(2)));
        assert_eq!(board.position_of(UnitId(1)), None);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_place_same_unit_moves_it() {
        let mut board = Board::new();
        let unit = pawn(7, Player::A);
        board.place(pos(0, 0), unit);
        board.place(pos(3, 3), unit);

        assert_eq!(board.get(pos(0, 0)), None);
        assert_eq!(board.position_of(UnitId(7)), Some(pos(3, 3)));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut board = Board::new();
        board.place(pos(4, 0), pawn(3, Player::B));

        assert_eq!(board.remove(pos(4, 0)).map(|u| u.id), Some(UnitId(3)));
        assert_eq!(board.remove(pos(4, 0)), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_find_unit_scans_row_major() {
        let mut board = Board::new();
        board.place(pos(3, 0), pawn(1, Player::A));
        board.place(pos(0, 4), pawn(2, Player::A));
        board.place(pos(0, 1), pawn(3, Player::B));

        let (at, unit) = board
            .find_unit(Player::A, |u| u.kind == UnitKind::Pawn)
            .unwrap();
        assert_eq!(at, pos(0, 4));
        assert_eq!(unit.id, UnitId(2));
        assert!(board.find_unit(Player::B, |u| u.kind == UnitKind::Hero1).is_none());
    }

    #[test]
    fn test_count_units() {
        let mut board = Board::new();
        board.place(pos(0, 0), pawn(1, Player::A));
        board.place(pos(0, 1), pawn(2, Player::A));
        board.place(pos(4, 4), pawn(3, Player::B));

        assert_eq!(board.count_units(Player::A), 2);
        assert_eq!(board.count_units(Player::B), 1);
    }

    #[test]
    fn test_board_json_shape() {
        let mut board = Board::new();
        board.place(pos(0, 2), Unit::new(UnitId(4), Player::A, UnitKind::Hero2));

        let value = serde_json::to_value(&board).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), BOARD_SIZE);
        assert!(rows[0][0].is_null());
        assert_eq!(rows[0][2]["id"], 4);
        assert_eq!(rows[0][2]["name"], "Hero2");
        assert_eq!(rows[0][2]["owner"], "A");
        assert_eq!(rows[0][2]["type"], "Hero2");
    }

    #[test]
    fn test_board_from_json_rebuilds_index() {
        let mut board = Board::new();
        board.place(pos(3, 1), pawn(9, Player::B));
        let json = serde_json::to_string(&board).unwrap();

        let decoded: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, board);
        assert_eq!(decoded.position_of(UnitId(9)), Some(pos(3, 1)));
    }

    #[test]
    fn test_board_rejects_bad_shape_and_duplicates() {
        let short = serde_json::json!([[null], [null]]);
        assert!(serde_json::from_value::<Board>(short).is_err());

        let unit = serde_json::json!({ "id": 1, "name": "Pawn", "owner": "A", "type": "Pawn" });
        let mut rows = vec![vec![serde_json::Value::Null; BOARD_SIZE]; BOARD_SIZE];
        rows[0][0] = unit.clone();
        rows[1][1] = unit;
        assert!(serde_json::from_value::<Board>(serde_json::json!(rows)).is_err());
    }
}
