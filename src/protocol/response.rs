use super::error::ErrorCode;
use crate::lobby::{LobbySummary, LobbyToken};
use serde::Serialize;

/// Merged into every envelope so clients can detect an incompatible server
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Greeting { keeperfx: bool },
    Pong { pong: bool },
    Created { token: LobbyToken },
    Lobbies { lobbies: Vec<LobbySummary> },
    Error { error: ErrorCode },
    Empty {},
}

/// Envelope sent back for every handled message: `{"success": .., <payload>, "v": ..}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(rename = "v")]
    pub version: u32,
}

impl Response {
    fn new(success: bool, payload: Payload) -> Self {
        Self {
            success,
            payload,
            version: PROTOCOL_VERSION,
        }
    }

    pub fn success() -> Self {
        Self::new(true, Payload::Empty {})
    }

    pub fn with(payload: Payload) -> Self {
        Self::new(true, payload)
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new(false, Payload::Error { error: code })
    }

    /// Sent unprompted when a connection opens. Identifies the server and
    /// announces the protocol version before the client sends anything.
    pub fn greeting() -> Self {
        Self::with(Payload::Greeting { keeperfx: true })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self.payload {
            Payload::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<ErrorCode> for Response {
    fn from(code: ErrorCode) -> Self {
        Self::error(code)
    }
}
