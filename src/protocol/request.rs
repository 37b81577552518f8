use super::error::ErrorCode;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Ping,
    CreateLobby,
    ListLobbies,
    UpdateLobby,
    RemoveLobby,
    KeepaliveLobby,
    Unknown,
}

impl Method {
    fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("ping") => Self::Ping,
            Some("create_lobby") => Self::CreateLobby,
            Some("list_lobbies") => Self::ListLobbies,
            Some("update_lobby") => Self::UpdateLobby,
            Some("remove_lobby") => Self::RemoveLobby,
            Some("keepalive_lobby") => Self::KeepaliveLobby,
            _ => Self::Unknown,
        }
    }
}

/// One decoded client message
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    fields: Map<String, Value>,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            fields: Map::new(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ErrorCode> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ErrorCode::InvalidJson)?;

        // Valid JSON that is not an object cannot carry a method
        let Value::Object(fields) = value else {
            return Err(ErrorCode::NoMethod);
        };

        let method = match fields.get("method") {
            None | Some(Value::Null) => return Err(ErrorCode::NoMethod),
            Some(method) => Method::from_value(method),
        };

        Ok(Self { method, fields })
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    /// A field that is only honoured when it holds a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// The raw `method` value, for logging requests that could not be routed
    pub fn raw_method(&self) -> &Value {
        self.fields.get("method").unwrap_or(&Value::Null)
    }

    pub fn lobby_token(&self) -> Result<&str, ErrorCode> {
        self.field("token")
            .ok_or(ErrorCode::NoLobbyToken)?
            .as_str()
            .ok_or(ErrorCode::InvalidLobbyToken)
    }
}
