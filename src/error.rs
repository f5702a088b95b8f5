use thiserror::Error;

use crate::types::Cell;

/// Reasons a game_state payload is skipped instead of decided on.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed game state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} {cell} lies outside the board")]
    OutOfBounds { field: &'static str, cell: Cell },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("invalid {field} name {value:?}: {reason}")]
    BadName {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("failed to read credentials file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mqtt client request failed: {0}")]
    Client(#[from] rumqttc::ClientError),

    #[error("failed to encode outbound payload: {0}")]
    Encode(#[from] serde_json::Error),
}
