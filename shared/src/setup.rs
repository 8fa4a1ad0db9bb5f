//! Starting layouts.

use thiserror::Error;

use crate::board::{Board, Player, Position, Unit, UnitId, UnitKind, BOARD_SIZE};

/// Home row of each player. A is placed along row 0, B along row 4.
pub fn home_row(player: Player) -> usize {
    match player {
        Player::A => 0,
        Player::B => BOARD_SIZE - 1,
    }
}

/// The rosters used by the bundled client.
pub const SAMPLE_ROSTER_A: [UnitKind; 5] = [
    UnitKind::Pawn,
    UnitKind::Pawn,
    UnitKind::Hero1,
    UnitKind::Hero2,
    UnitKind::Pawn,
];
pub const SAMPLE_ROSTER_B: [UnitKind; 5] = [
    UnitKind::Hero2,
    UnitKind::Pawn,
    UnitKind::Hero1,
    UnitKind::Pawn,
    UnitKind::Pawn,
];

/// The four-unit layout a server starts with before anyone sends a roster.
const DEFAULT_LAYOUT: [(usize, usize, Player, UnitKind); 4] = [
    (0, 0, Player::A, UnitKind::Pawn),
    (0, 4, Player::A, UnitKind::Hero1),
    (4, 0, Player::B, UnitKind::Hero2),
    (4, 4, Player::B, UnitKind::Pawn),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    Default,
    Rosters { a: Vec<UnitKind>, b: Vec<UnitKind> },
}

impl Setup {
    /// Builds a setup from the two optional rosters of an `initializeGame`
    /// message. Both absent selects the default layout.
    pub fn from_optional(
        a: Option<Vec<UnitKind>>,
        b: Option<Vec<UnitKind>>,
    ) -> Result<Self, SetupError> {
        match (a, b) {
            (None, None) => Ok(Setup::Default),
            (Some(a), Some(b)) => Ok(Setup::Rosters { a, b }),
            (None, Some(_)) => Err(SetupError::MissingRoster(Player::A)),
            (Some(_), None) => Err(SetupError::MissingRoster(Player::B)),
        }
    }

    pub fn sample() -> Self {
        Setup::Rosters {
            a: SAMPLE_ROSTER_A.to_vec(),
            b: SAMPLE_ROSTER_B.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("no roster supplied for player {0}")]
    MissingRoster(Player),
    #[error("roster for player {0} is empty")]
    EmptyRoster(Player),
    #[error("roster for player {0} has {1} units, at most {max} fit on a row", max = BOARD_SIZE)]
    RosterTooLong(Player, usize),
}

impl SetupError {
    pub fn kind(self) -> &'static str {
        match self {
            SetupError::MissingRoster(_) => "MissingRoster",
            SetupError::EmptyRoster(_) => "EmptyRoster",
            SetupError::RosterTooLong(..) => "RosterTooLong",
        }
    }
}

/// Places units in the given order, handing out ids from 0.
fn lay_out(placements: impl IntoIterator<Item = (usize, usize, Player, UnitKind)>) -> Board {
    let mut board = Board::new();
    let mut next_id = 0;
    for (row, col, owner, kind) in placements {
        if let Some(pos) = Position::new(row, col) {
            board.place(pos, Unit::new(UnitId(next_id), owner, kind));
            next_id += 1;
        }
    }
    board
}

pub fn default_board() -> Board {
    lay_out(DEFAULT_LAYOUT)
}

/// Lays out a fresh board. Unit ids are handed out in placement order,
/// player A's units first.
pub fn build_board(setup: &Setup) -> Result<Board, SetupError> {
    let (a, b) = match setup {
        Setup::Default => return Ok(default_board()),
        Setup::Rosters { a, b } => (a, b),
    };

    for (player, roster) in [(Player::A, a), (Player::B, b)] {
        if roster.is_empty() {
            return Err(SetupError::EmptyRoster(player));
        }
        if roster.len() > BOARD_SIZE {
            return Err(SetupError::RosterTooLong(player, roster.len()));
        }
    }

    let placements = [(Player::A, a), (Player::B, b)]
        .into_iter()
        .flat_map(|(player, roster)| {
            let row = home_row(player);
            roster
                .iter()
                .enumerate()
                .map(move |(col, kind)| (row, col, player, *kind))
        });
    Ok(lay_out(placements))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_default_layout() {
        let board = build_board(&Setup::Default).unwrap();
        assert_eq!(board, default_board());
        assert_eq!(board.len(), 4);

        let occupant = |row, col| board.get(pos(row, col)).map(|u| (u.owner, u.kind));
        assert_eq!(occupant(0, 0), Some((Player::A, UnitKind::Pawn)));
        assert_eq!(occupant(0, 4), Some((Player::A, UnitKind::Hero1)));
        assert_eq!(occupant(4, 0), Some((Player::B, UnitKind::Hero2)));
        assert_eq!(occupant(4, 4), Some((Player::B, UnitKind::Pawn)));
    }

    #[test]
    fn test_roster_placement() {
        let board = build_board(&Setup::sample()).unwrap();
        assert_eq!(board.len(), 10);

        for (col, kind) in SAMPLE_ROSTER_A.iter().enumerate() {
            let unit = board.get(pos(0, col)).unwrap();
            assert_eq!(unit.owner, Player::A);
            assert_eq!(unit.kind, *kind);
            assert_eq!(unit.id, UnitId(col as u32));
        }
        for (col, kind) in SAMPLE_ROSTER_B.iter().enumerate() {
            let unit = board.get(pos(4, col)).unwrap();
            assert_eq!(unit.owner, Player::B);
            assert_eq!(unit.kind, *kind);
            assert_eq!(unit.id, UnitId(5 + col as u32));
        }
    }

    #[test]
    fn test_short_roster() {
        let setup = Setup::Rosters {
            a: vec![UnitKind::Hero1],
            b: vec![UnitKind::Pawn, UnitKind::Pawn],
        };
        let board = build_board(&setup).unwrap();
        assert_eq!(board.count_units(Player::A), 1);
        assert_eq!(board.count_units(Player::B), 2);
        assert_eq!(board.position_of(UnitId(2)), Some(pos(4, 1)));
    }

    #[test]
    fn test_invalid_rosters() {
        let setup = Setup::Rosters {
            a: vec![],
            b: vec![UnitKind::Pawn],
        };
        assert_eq!(build_board(&setup), Err(SetupError::EmptyRoster(Player::A)));

        let setup = Setup::Rosters {
            a: vec![UnitKind::Pawn],
            b: vec![UnitKind::Pawn; 6],
        };
        assert_eq!(
            build_board(&setup),
            Err(SetupError::RosterTooLong(Player::B, 6))
        );
    }

    #[test]
    fn test_from_optional() {
        assert_eq!(Setup::from_optional(None, None), Ok(Setup::Default));
        assert_eq!(
            Setup::from_optional(None, Some(vec![UnitKind::Pawn])),
            Err(SetupError::MissingRoster(Player::A))
        );
        assert_eq!(
            Setup::from_optional(Some(vec![UnitKind::Pawn]), None),
            Err(SetupError::MissingRoster(Player::B))
        );
        assert!(matches!(
            Setup::from_optional(Some(vec![UnitKind::Pawn]), Some(vec![UnitKind::Hero2])),
            Ok(Setup::Rosters { .. })
        ));
    }
}
