use super::error::ErrorCode;
use super::request::{Method, Request};
use super::response::{Payload, Response};
use crate::lobby::{
    DEFAULT_LOBBY_PORT, DEFAULT_PLAYER_NAME, Lobby, LobbyRegistry, LobbyStatus, NewLobby, Player,
    PlayerColor,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(20);

/// Routes client messages to the lobby registry.
///
/// The registry lock is held for the whole of one request (stale sweep, token
/// lookup and mutation), so concurrent connections never observe a half-applied
/// request. Nothing inside the critical section awaits or performs I/O.
pub struct Dispatcher {
    registry: Mutex<LobbyRegistry>,
    keepalive: Duration,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_KEEPALIVE)
    }
}

impl Dispatcher {
    pub fn new(keepalive: Duration) -> Self {
        Self {
            registry: Mutex::new(LobbyRegistry::new()),
            keepalive,
        }
    }

    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    fn lock(&self) -> MutexGuard<'_, LobbyRegistry> {
        // The registry has no invariant a panicking holder could leave half-done
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the registry
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut LobbyRegistry) -> R) -> R {
        f(&mut self.lock())
    }

    /// Handle one raw message from `peer`. Blank messages get no response.
    pub fn handle(&self, raw: &str, peer: SocketAddr) -> Option<Response> {
        if raw.trim().is_empty() {
            return None;
        }

        let request = match Request::parse(raw) {
            Ok(request) => request,
            Err(code) => {
                debug!(%peer, %code, "Unable to parse message");
                return Some(Response::error(code));
            }
        };

        Some(self.dispatch(&request, peer))
    }

    /// Execute an already parsed request
    pub fn dispatch(&self, request: &Request, peer: SocketAddr) -> Response {
        let now = Instant::now();
        let mut registry = self.lock();

        let stale = registry.sweep_stale(now, self.keepalive);
        if !stale.is_empty() {
            info!(count = stale.len(), tokens = ?stale, "Lobbies became stale");
        }

        match route(&mut registry, request, peer, now) {
            Ok(response) => response,
            Err(code) => {
                warn!(%peer, method = %request.raw_method(), %code, "Request rejected");
                Response::error(code)
            }
        }
    }
}

fn route(
    registry: &mut LobbyRegistry,
    request: &Request,
    peer: SocketAddr,
    now: Instant,
) -> Result<Response, ErrorCode> {
    match request.method {
        Method::Ping => Ok(Response::with(Payload::Pong { pong: true })),
        Method::CreateLobby => Ok(create_lobby(registry, request, peer, now)),
        Method::ListLobbies => {
            let lobbies = registry.list_public();
            debug!(%peer, count = lobbies.len(), "Listing lobbies");
            Ok(Response::with(Payload::Lobbies { lobbies }))
        }
        Method::UpdateLobby | Method::RemoveLobby | Method::KeepaliveLobby => {
            let token = request.lobby_token()?;
            let lobby = registry.get_mut(token).ok_or(ErrorCode::LobbyNotFound)?;

            match request.method {
                Method::UpdateLobby => update_lobby(lobby, request, now),
                Method::KeepaliveLobby => {
                    lobby.heartbeat(now);
                    debug!(%peer, token, "Lobby keepalive");
                    Ok(Response::success())
                }
                _ => {
                    registry.remove(token);
                    info!(%peer, token, "Lobby removed");
                    Ok(Response::success())
                }
            }
        }
        Method::Unknown => Err(ErrorCode::UnknownPacketType),
    }
}

fn create_lobby(
    registry: &mut LobbyRegistry,
    request: &Request,
    peer: SocketAddr,
    now: Instant,
) -> Response {
    let ip = peer.ip().to_canonical().to_string();
    let player_name = request
        .str_field("player_name")
        .unwrap_or(DEFAULT_PLAYER_NAME)
        .to_string();
    let name = request
        .str_field("name")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{player_name}'s Lobby"));

    let host = Player::new(player_name.clone(), Some(ip.clone()), Some(PlayerColor::Red));
    let lobby = registry.create(
        NewLobby {
            name,
            ip,
            port: requested_port(request.field("port")),
            players: vec![host],
            has_password: false,
            game_version: request.str_field("game_version").map(str::to_string),
        },
        now,
    );

    info!(%peer, player_name, lobby = %lobby.name, "Created lobby");
    Response::with(Payload::Created {
        token: lobby.token.clone(),
    })
}

/// Any numeric value (or numeric string) within port range; otherwise the default
fn requested_port(value: Option<&Value>) -> u16 {
    let port = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    port.filter(|port| (0.0..=f64::from(u16::MAX)).contains(port))
        .map(|port| port as u16)
        .unwrap_or(DEFAULT_LOBBY_PORT)
}

fn update_lobby(lobby: &mut Lobby, request: &Request, now: Instant) -> Result<Response, ErrorCode> {
    let result = apply_update(lobby, request);
    // Refreshed whatever the outcome: the host is evidently still alive
    lobby.heartbeat(now);
    result
}

/// All-or-nothing: the status is validated before any field is written
fn apply_update(lobby: &mut Lobby, request: &Request) -> Result<Response, ErrorCode> {
    let status = request
        .str_field("status")
        .map(|raw| LobbyStatus::parse(raw).ok_or(ErrorCode::InvalidLobbyStatus))
        .transpose()?;
    let players: Option<Vec<Player>> = request
        .field("players")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(Player::from_value).collect());
    let name = request.str_field("name");

    if status.is_none() && players.is_none() && name.is_none() {
        return Err(ErrorCode::NothingUpdatedForLobby);
    }

    if let Some(status) = status {
        lobby.status = status;
    }
    if let Some(players) = players {
        lobby.players = players;
    }
    if let Some(name) = name {
        lobby.name = name.to_string();
    }

    debug!(token = %lobby.token, status = ?lobby.status, players = lobby.players.len(), "Lobby updated");
    Ok(Response::success())
}
