use super::model::{Lobby, LobbySummary, NewLobby};
use super::token::{LobbyToken, generate_unique_token};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// All live lobbies, keyed by token (pure, no transport concerns).
///
/// Every method takes `&mut self` or `&self`; callers that share a registry
/// between connections are responsible for serializing access.
#[derive(Debug, Default)]
pub struct LobbyRegistry {
    lobbies: HashMap<LobbyToken, Lobby>,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }

    /// Register a lobby under a freshly generated token
    pub fn create(&mut self, new: NewLobby, now: Instant) -> &Lobby {
        let token = generate_unique_token(|token| self.lobbies.contains_key(token));
        debug!(%token, name = %new.name, "Registering lobby");
        self.lobbies
            .entry(token.clone())
            .or_insert(Lobby::new(token, new, now))
    }

    pub fn get(&self, token: &str) -> Option<&Lobby> {
        self.lobbies.get(token)
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut Lobby> {
        self.lobbies.get_mut(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lobbies.contains_key(token)
    }

    /// Remove a lobby. Absent tokens are ignored.
    pub fn remove(&mut self, token: &str) -> Option<Lobby> {
        self.lobbies.remove(token)
    }

    /// Refresh a lobby's heartbeat. Returns false if the lobby does not exist.
    pub fn touch(&mut self, token: &str, now: Instant) -> bool {
        let Some(lobby) = self.lobbies.get_mut(token) else {
            return false;
        };
        lobby.heartbeat(now);
        true
    }

    /// Public view of every lobby, oldest first
    pub fn list_public(&self) -> Vec<LobbySummary> {
        let mut lobbies: Vec<&Lobby> = self.lobbies.values().collect();
        lobbies.sort_by_key(|lobby| lobby.created_at);
        lobbies.into_iter().map(Lobby::summary).collect()
    }

    /// Drop every lobby whose last heartbeat is older than `threshold`.
    /// Returns the tokens that were removed.
    pub fn sweep_stale(&mut self, now: Instant, threshold: Duration) -> Vec<LobbyToken> {
        let stale: Vec<LobbyToken> = self
            .lobbies
            .values()
            .filter(|lobby| lobby.is_stale(now, threshold))
            .map(|lobby| lobby.token.clone())
            .collect();

        for token in &stale {
            self.lobbies.remove(token.as_str());
        }

        stale
    }
}
