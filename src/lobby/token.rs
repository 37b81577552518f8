use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

const TOKEN_LENGTH: usize = 16;

/// Opaque identifier of a lobby. Whoever holds it may update or remove the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LobbyToken(String);

impl LobbyToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LobbyToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn generate_token() -> LobbyToken {
    let token = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    LobbyToken(token)
}

/// Generate tokens until one is found that `exists` reports as free.
pub fn generate_unique_token<F>(exists: F) -> LobbyToken
where
    F: Fn(&str) -> bool,
{
    loop {
        let token = generate_token();
        if !exists(token.as_str()) {
            return token;
        }
    }
}
