use super::player::Player;
use super::token::LobbyToken;
use serde::Serialize;
use std::time::Instant;

pub const DEFAULT_LOBBY_PORT: u16 = 5556;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LobbyStatus {
    Open,
    Full,
    InGame,
}

impl LobbyStatus {
    /// Parse a wire value. Unknown values are rejected, never coerced.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OPEN" => Some(Self::Open),
            "FULL" => Some(Self::Full),
            "IN_GAME" => Some(Self::InGame),
            _ => None,
        }
    }
}

/// Everything a host supplies when registering a lobby
#[derive(Debug, Clone)]
pub struct NewLobby {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub players: Vec<Player>,
    pub has_password: bool,
    pub game_version: Option<String>,
}

/// A registered game session
#[derive(Debug, Clone)]
pub struct Lobby {
    pub token: LobbyToken,
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub players: Vec<Player>,
    pub status: LobbyStatus,
    pub has_password: bool,
    pub game_version: Option<String>,
    pub created_at: Instant,
    pub last_heartbeat: Instant,
}

impl Lobby {
    pub fn new(token: LobbyToken, new: NewLobby, now: Instant) -> Self {
        Self {
            token,
            name: new.name,
            ip: new.ip,
            port: new.port,
            players: new.players,
            status: LobbyStatus::Open,
            has_password: new.has_password,
            game_version: new.game_version,
            created_at: now,
            last_heartbeat: now,
        }
    }

    pub fn heartbeat(&mut self, now: Instant) {
        self.last_heartbeat = now;
    }

    pub fn is_stale(&self, now: Instant, threshold: std::time::Duration) -> bool {
        now.saturating_duration_since(self.last_heartbeat) > threshold
    }

    /// Project to the fields any client may see. The token is a bearer credential
    /// and never leaves the owner's connection.
    pub fn summary(&self) -> LobbySummary {
        LobbySummary {
            name: self.name.clone(),
            ip: self.ip.clone(),
            port: self.port,
            players: self.players.clone(),
            status: self.status,
            has_password: self.has_password,
            game_version: self.game_version.clone().unwrap_or_default(),
        }
    }
}

/// A lobby as listed to clients looking for a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobbySummary {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub players: Vec<Player>,
    pub status: LobbyStatus,
    pub has_password: bool,
    /// Empty when the host did not report a version
    pub game_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::player::PlayerColor;
    use crate::lobby::token::generate_token;
    use serde_json::json;
    use std::time::Duration;

    fn new_lobby() -> NewLobby {
        NewLobby {
            name: "Alice's Lobby".to_string(),
            ip: "10.0.0.1".to_string(),
            port: DEFAULT_LOBBY_PORT,
            players: vec![Player::new("Alice", Some("10.0.0.1".to_string()), Some(PlayerColor::Red))],
            has_password: false,
            game_version: None,
        }
    }

    #[test]
    fn parses_known_statuses() {
        assert_eq!(LobbyStatus::parse("OPEN"), Some(LobbyStatus::Open));
        assert_eq!(LobbyStatus::parse("FULL"), Some(LobbyStatus::Full));
        assert_eq!(LobbyStatus::parse("IN_GAME"), Some(LobbyStatus::InGame));
    }

    #[test]
    fn rejects_unknown_statuses() {
        assert_eq!(LobbyStatus::parse("bogus"), None);
        assert_eq!(LobbyStatus::parse("open"), None);
        assert_eq!(LobbyStatus::parse(""), None);
    }

    #[test]
    fn new_lobby_is_open_with_fresh_heartbeat() {
        let now = Instant::now();
        let lobby = Lobby::new(generate_token(), new_lobby(), now);

        assert_eq!(lobby.status, LobbyStatus::Open);
        assert_eq!(lobby.last_heartbeat, now);
        assert_eq!(lobby.created_at, now);
    }

    #[test]
    fn stale_only_after_threshold_is_exceeded() {
        let now = Instant::now();
        let lobby = Lobby::new(generate_token(), new_lobby(), now);
        let threshold = Duration::from_secs(20);

        assert!(!lobby.is_stale(now + Duration::from_secs(19), threshold));
        assert!(!lobby.is_stale(now + Duration::from_secs(20), threshold));
        assert!(lobby.is_stale(now + Duration::from_secs(21), threshold));
    }

    #[test]
    fn summary_hides_token() {
        let lobby = Lobby::new(generate_token(), new_lobby(), Instant::now());
        let json = serde_json::to_value(lobby.summary()).unwrap();

        assert_eq!(
            json,
            json!({
                "name": "Alice's Lobby",
                "ip": "10.0.0.1",
                "port": 5556,
                "players": [{"name": "Alice", "ip": "10.0.0.1", "color": "red"}],
                "status": "OPEN",
                "has_password": false,
                "game_version": ""
            })
        );
    }

    #[test]
    fn summary_reports_game_version() {
        let mut new = new_lobby();
        new.game_version = Some("1.0.0".to_string());
        let lobby = Lobby::new(generate_token(), new, Instant::now());

        assert_eq!(lobby.summary().game_version, "1.0.0");
    }
}
