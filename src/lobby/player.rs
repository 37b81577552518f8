use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PLAYER_NAME: &str = "Keeper";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    White,
    Purple,
    Black,
    Orange,
}

impl PlayerColor {
    /// Parse a wire value. Unknown values yield `None`; callers treat that as "no color".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "white" => Some(Self::White),
            "purple" => Some(Self::Purple),
            "black" => Some(Self::Black),
            "orange" => Some(Self::Orange),
            _ => None,
        }
    }
}

/// A player listed in a lobby roster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub ip: Option<String>,
    pub color: Option<PlayerColor>,
}

impl Player {
    pub fn new(name: impl Into<String>, ip: Option<String>, color: Option<PlayerColor>) -> Self {
        Self {
            name: name.into(),
            ip,
            color,
        }
    }

    /// Build a player from a roster entry sent by a client. Every field falls back
    /// independently; an entry that is not an object yields a fully defaulted player.
    pub fn from_value(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PLAYER_NAME);
        let ip = value.get("ip").and_then(Value::as_str).map(str::to_string);
        let color = value
            .get("color")
            .and_then(Value::as_str)
            .and_then(PlayerColor::parse);

        Self::new(name, ip, color)
    }
}
