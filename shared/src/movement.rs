//! Movement rules: which way each unit type may travel.
//!
//! "Forward" is towards row 0 for both players. The board is not mirrored for
//! player B.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::UnitKind;

/// A (row, column) step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displacement {
    pub rows: i32,
    pub cols: i32,
}

impl Displacement {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    const fn scaled(self, factor: i32) -> Self {
        Self::new(self.rows * factor, self.cols * factor)
    }
}

/// Symbolic movement request sent by a client.
///
/// Tokens that are not one of the eight known directions are kept as
/// [`Direction::Unrecognized`] so the rules can reject them like any other
/// impossible move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
    Unrecognized(String),
}

impl Direction {
    pub fn token(&self) -> &str {
        match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
            Direction::ForwardLeft => "ForwardLeft",
            Direction::ForwardRight => "ForwardRight",
            Direction::BackwardLeft => "BackwardLeft",
            Direction::BackwardRight => "BackwardRight",
            Direction::Unrecognized(token) => token,
        }
    }

    fn orthogonal_step(&self) -> Option<Displacement> {
        match self {
            Direction::Left => Some(Displacement::new(0, -1)),
            Direction::Right => Some(Displacement::new(0, 1)),
            Direction::Forward => Some(Displacement::new(-1, 0)),
            Direction::Backward => Some(Displacement::new(1, 0)),
            _ => None,
        }
    }

    fn diagonal_step(&self) -> Option<Displacement> {
        match self {
            Direction::ForwardLeft => Some(Displacement::new(-1, -1)),
            Direction::ForwardRight => Some(Displacement::new(-1, 1)),
            Direction::BackwardLeft => Some(Displacement::new(1, -1)),
            Direction::BackwardRight => Some(Displacement::new(1, 1)),
            _ => None,
        }
    }
}

impl From<String> for Direction {
    fn from(token: String) -> Self {
        match token.as_str() {
            "Left" | "L" => Direction::Left,
            "Right" | "R" => Direction::Right,
            "Forward" | "F" => Direction::Forward,
            "Backward" | "B" => Direction::Backward,
            "ForwardLeft" | "FL" => Direction::ForwardLeft,
            "ForwardRight" | "FR" => Direction::ForwardRight,
            "BackwardLeft" | "BL" => Direction::BackwardLeft,
            "BackwardRight" | "BR" => Direction::BackwardRight,
            _ => Direction::Unrecognized(token),
        }
    }
}

impl From<&str> for Direction {
    fn from(token: &str) -> Self {
        Direction::from(token.to_string())
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Unrecognized(token) => token,
            known => known.token().to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Hero1 travels two cells orthogonally. Hero2 travels two cells diagonally.
pub const HERO_RANGE: i32 = 2;

/// Maps a unit type and direction to a displacement.
///
/// Returns `None` when the unit cannot move that way at all.
pub fn displacement(kind: UnitKind, direction: &Direction) -> Option<Displacement> {
    match kind {
        UnitKind::Pawn => direction.orthogonal_step(),
        UnitKind::Hero1 => direction
            .orthogonal_step()
            .map(|step| step.scaled(HERO_RANGE)),
        UnitKind::Hero2 => direction
            .diagonal_step()
            .map(|step| step.scaled(HERO_RANGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_moves_one_step() {
        let pawn = UnitKind::Pawn;
        assert_eq!(displacement(pawn, &Direction::Left), Some(Displacement::new(0, -1)));
        assert_eq!(displacement(pawn, &Direction::Right), Some(Displacement::new(0, 1)));
        assert_eq!(displacement(pawn, &Direction::Forward), Some(Displacement::new(-1, 0)));
        assert_eq!(displacement(pawn, &Direction::Backward), Some(Displacement::new(1, 0)));
        assert_eq!(displacement(pawn, &Direction::ForwardLeft), None);
    }

    #[test]
    fn test_hero1_moves_two_orthogonally() {
        let hero = UnitKind::Hero1;
        assert_eq!(displacement(hero, &Direction::Left), Some(Displacement::new(0, -2)));
        assert_eq!(displacement(hero, &Direction::Right), Some(Displacement::new(0, 2)));
        assert_eq!(displacement(hero, &Direction::Forward), Some(Displacement::new(-2, 0)));
        assert_eq!(displacement(hero, &Direction::Backward), Some(Displacement::new(2, 0)));
        assert_eq!(displacement(hero, &Direction::BackwardRight), None);
    }

    #[test]
    fn test_hero2_moves_two_diagonally() {
        let hero = UnitKind::Hero2;
        assert_eq!(
            displacement(hero, &Direction::ForwardLeft),
            Some(Displacement::new(-2, -2))
        );
        assert_eq!(
            displacement(hero, &Direction::ForwardRight),
            Some(Displacement::new(-2, 2))
        );
        assert_eq!(
            displacement(hero, &Direction::BackwardLeft),
            Some(Displacement::new(2, -2))
        );
        assert_eq!(
            displacement(hero, &Direction::BackwardRight),
            Some(Displacement::new(2, 2))
        );
        assert_eq!(displacement(hero, &Direction::Forward), None);
    }

    #[test]
    fn test_unrecognized_direction_has_no_displacement() {
        let direction = Direction::from("Sideways");
        assert_eq!(direction, Direction::Unrecognized("Sideways".to_string()));
        for kind in [UnitKind::Pawn, UnitKind::Hero1, UnitKind::Hero2] {
            assert_eq!(displacement(kind, &direction), None);
        }
    }

    #[test]
    fn test_short_tokens() {
        assert_eq!(Direction::from("L"), Direction::Left);
        assert_eq!(Direction::from("B"), Direction::Backward);
        assert_eq!(Direction::from("FR"), Direction::ForwardRight);
        assert_eq!(Direction::from("BL"), Direction::BackwardLeft);
    }

    #[test]
    fn test_direction_json() {
        let decoded: Direction = serde_json::from_str("\"BackwardRight\"").unwrap();
        assert_eq!(decoded, Direction::BackwardRight);

        let unknown: Direction = serde_json::from_str("\"Up\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Up\"");
    }
}
