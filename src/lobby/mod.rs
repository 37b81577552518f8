pub mod model;
pub mod player;
pub mod registry;
mod token;

pub use model::{DEFAULT_LOBBY_PORT, Lobby, LobbyStatus, LobbySummary, NewLobby};
pub use player::{DEFAULT_PLAYER_NAME, Player, PlayerColor};
pub use registry::LobbyRegistry;
pub use token::LobbyToken;
