pub mod board;
pub mod movement;
pub mod protocol;
pub mod rules;
pub mod setup;
pub mod turn;

pub use board::{Board, BoardError, Player, Position, Unit, UnitId, UnitKind, BOARD_SIZE};
pub use movement::{displacement, Direction, Displacement};
pub use protocol::{ClientMessage, ServerMessage};
pub use rules::{locate_unit, resolve_move, MoveError, MoveRequest, ResolvedMove, UnitRef};
pub use setup::{build_board, default_board, Setup, SetupError, SAMPLE_ROSTER_A, SAMPLE_ROSTER_B};
pub use turn::{GameState, GameStatus, MoveOutcome};
