pub mod config;
pub mod lobby;
pub mod protocol;
pub mod server;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State, WebSocketUpgrade},
    routing::get,
};
use protocol::{Dispatcher, Method, Request};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| server::handle_connection(socket, peer, state.dispatcher))
}

/// Same envelope as the `list_lobbies` method, for browsers and scripts
async fn list_lobbies(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Json<protocol::Response> {
    Json(
        state
            .dispatcher
            .dispatch(&Request::new(Method::ListLobbies), peer),
    )
}

pub fn app(dispatcher: Arc<Dispatcher>) -> Router {
    let state = AppState { dispatcher };

    Router::new()
        .route("/health", get(health))
        .route("/lobbies", get(list_lobbies))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the HTTP surface, exposing each client's address to the handlers
pub async fn serve_http(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    axum::serve(
        listener,
        app(dispatcher).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
