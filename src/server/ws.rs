use super::session::ConnectionContext;
use crate::protocol::{Dispatcher, Response};
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, warn};

/// Serve one WebSocket client. Each text frame carries one message.
pub async fn handle_connection(socket: WebSocket, peer: SocketAddr, dispatcher: Arc<Dispatcher>) {
    let ctx = ConnectionContext::new(peer, "websocket");
    let span = ctx.span();
    run_connection(socket, ctx.peer, dispatcher).instrument(span).await;
}

async fn run_connection(socket: WebSocket, peer: SocketAddr, dispatcher: Arc<Dispatcher>) {
    debug!("Connection opened");
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<Response>(16);

    let send_task = tokio::spawn(send_loop(sender, rx).in_current_span());
    let recv_task = tokio::spawn(receive_loop(receiver, tx, dispatcher, peer).in_current_span());

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    debug!("Connection closed");
}

async fn send_loop(mut sender: SplitSink<WebSocket, Message>, mut rx: mpsc::Receiver<Response>) {
    while let Some(response) = rx.recv().await {
        let json = match response.to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "Failed to encode response");
                continue;
            }
        };

        if sender.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    tx: mpsc::Sender<Response>,
    dispatcher: Arc<Dispatcher>,
    peer: SocketAddr,
) {
    if tx.send(Response::greeting()).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => {
                debug!("Received non-text message, ignoring");
                continue;
            }
        };

        debug!(raw = %text, "Received message");

        let Some(response) = dispatcher.handle(&text, peer) else {
            continue;
        };

        if tx.send(response).await.is_err() {
            break;
        }
    }
}
