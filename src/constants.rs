use std::time::Duration;

use crate::types::Cell;

pub const BOARD_SIZE: i32 = 10;
pub const BOARD_CELLS: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// Fallback coins closer than this (Manhattan) are treated as collected.
pub const FALLBACK_PRUNE_RADIUS: i32 = 2;

pub const FALLBACK_SEEDS: [Cell; 4] = [
    Cell::new(0, 0),
    Cell::new(0, 9),
    Cell::new(9, 0),
    Cell::new(9, 9),
];

pub const NEW_GAME_TOPIC: &str = "new_game";
pub const GAMES_TOPIC_ROOT: &str = "games";
pub const START_PAYLOAD: &str = "START";

pub const DEFAULT_LOBBY: &str = "TestLobby";
pub const DEFAULT_TEAM: &str = "ATeam";
pub const DEFAULT_PLAYER: &str = "Player1";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.env";
pub const MAX_NAME_LEN: usize = 32;

pub const KEEP_ALIVE: Duration = Duration::from_secs(30);
pub const START_DELAY: Duration = Duration::from_secs(1);
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(2);
pub const EVENT_QUEUE_CAPACITY: usize = 64;
pub const MANUAL_INPUT_BUFFER: usize = 16;
