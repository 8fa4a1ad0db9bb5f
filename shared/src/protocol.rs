//! JSON messages exchanged over the WebSocket connection.
//!
//! Every message is an object with a camelCase `type` discriminator.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, UnitKind};
use crate::rules::{MoveError, MoveRequest};
use crate::setup::SetupError;
use crate::turn::{GameState, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Starts a new game. Omitting both setups selects the default layout.
    InitializeGame {
        #[serde(rename = "playerASetup", default)]
        player_a_setup: Option<Vec<UnitKind>>,
        #[serde(rename = "playerBSetup", default)]
        player_b_setup: Option<Vec<UnitKind>>,
    },
    MakeMove(MoveRequest),
}

impl ClientMessage {
    pub fn initialize(a: &[UnitKind], b: &[UnitKind]) -> Self {
        ClientMessage::InitializeGame {
            player_a_setup: Some(a.to_vec()),
            player_b_setup: Some(b.to_vec()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Connected { client_id: u32 },
    /// Full authoritative state, sent to everyone after each accepted change.
    #[serde(rename_all = "camelCase")]
    GameStateUpdate {
        board: Board,
        current_turn: Player,
        status: GameStatus,
    },
    /// Sent only to the client whose move was rejected.
    InvalidMove { reason: MoveError },
    InvalidSetup { reason: String, detail: String },
    GameOver { winner: Player },
    ProtocolError { reason: String },
    Disconnected { reason: String },
}

impl ServerMessage {
    pub fn state_update(state: &GameState) -> Self {
        ServerMessage::GameStateUpdate {
            board: state.board().clone(),
            current_turn: state.current_turn(),
            status: state.status(),
        }
    }

    pub fn invalid_setup(error: SetupError) -> Self {
        ServerMessage::InvalidSetup {
            reason: error.kind().to_string(),
            detail: error.to_string(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
