use serde::Deserialize;

use crate::constants::GAMES_TOPIC_ROOT;
use crate::error::ProtocolError;
use crate::types::{BoardSnapshot, Cell, NewGameAnnouncement};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStatePayload {
    current_position: Cell,
    #[serde(default)]
    teammate_positions: Vec<Cell>,
    #[serde(default)]
    enemy_positions: Vec<Cell>,
    coin1: Vec<Cell>,
    coin2: Vec<Cell>,
    coin3: Vec<Cell>,
    walls: Vec<Cell>,
}

/// Decodes a `game_state` payload.
///
/// The agent's own position and every coin must be on the board. Walls,
/// teammates and enemies pass through untouched; consumers ignore the
/// off-board ones.
pub fn decode_snapshot(raw: &[u8]) -> Result<BoardSnapshot, ProtocolError> {
    let payload: GameStatePayload = serde_json::from_slice(raw)?;

    if !payload.current_position.in_bounds() {
        return Err(ProtocolError::OutOfBounds {
            field: "currentPosition",
            cell: payload.current_position,
        });
    }

    let mut coin_positions =
        Vec::with_capacity(payload.coin1.len() + payload.coin2.len() + payload.coin3.len());
    for (field, group) in [
        ("coin1", payload.coin1),
        ("coin2", payload.coin2),
        ("coin3", payload.coin3),
    ] {
        if let Some(cell) = group.iter().find(|cell| !cell.in_bounds()) {
            return Err(ProtocolError::OutOfBounds { field, cell: *cell });
        }
        coin_positions.extend(group);
    }

    Ok(BoardSnapshot {
        current_position: payload.current_position,
        teammate_positions: payload.teammate_positions,
        enemy_positions: payload.enemy_positions,
        coin_positions,
        wall_positions: payload.walls,
    })
}

pub fn encode_new_game(announcement: &NewGameAnnouncement) -> Result<String, serde_json::Error> {
    serde_json::to_string(announcement)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicKind {
    GameState,
    Lobby,
    Scores,
    Other,
}

pub fn classify_topic(topic: &str) -> TopicKind {
    if topic.ends_with("/game_state") {
        TopicKind::GameState
    } else if topic.ends_with("/lobby") {
        TopicKind::Lobby
    } else if topic.ends_with("/scores") {
        TopicKind::Scores
    } else {
        TopicKind::Other
    }
}

/// Topic names for one player in one lobby.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topics {
    lobby: String,
    player: String,
}

impl Topics {
    pub fn new(lobby: &str, player: &str) -> Self {
        Self {
            lobby: lobby.to_string(),
            player: player.to_string(),
        }
    }

    pub fn lobby(&self) -> String {
        format!("{GAMES_TOPIC_ROOT}/{}/lobby", self.lobby)
    }

    pub fn scores(&self) -> String {
        format!("{GAMES_TOPIC_ROOT}/{}/scores", self.lobby)
    }

    pub fn start(&self) -> String {
        format!("{GAMES_TOPIC_ROOT}/{}/start", self.lobby)
    }

    pub fn game_state(&self) -> String {
        format!("{GAMES_TOPIC_ROOT}/{}/{}/game_state", self.lobby, self.player)
    }

    pub fn moves(&self) -> String {
        format!("{GAMES_TOPIC_ROOT}/{}/{}/move", self.lobby, self.player)
    }

    pub fn subscriptions(&self) -> [String; 3] {
        [self.lobby(), self.game_state(), self.scores()]
    }
}
