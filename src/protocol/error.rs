use serde::Serialize;
use thiserror::Error;

/// Every failure a client can be told about. The serialized form is the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    #[error("message is not valid JSON")]
    InvalidJson,
    #[error("message has no method")]
    NoMethod,
    #[error("no lobby token given")]
    NoLobbyToken,
    #[error("lobby token is not a string")]
    InvalidLobbyToken,
    #[error("lobby not found")]
    LobbyNotFound,
    #[error("unknown lobby status")]
    InvalidLobbyStatus,
    #[error("nothing to update")]
    NothingUpdatedForLobby,
    #[error("unknown method")]
    UnknownPacketType,
}
