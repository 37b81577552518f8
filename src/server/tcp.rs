use super::session::ConnectionContext;
use crate::protocol::{Dispatcher, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, warn};

pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Accept connections forever, one task per client.
/// Messages are newline-delimited JSON in both directions.
pub async fn serve_tcp(listener: TcpListener, dispatcher: Arc<Dispatcher>, max_message_bytes: usize) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(%err, "Failed to accept connection");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };

        let ctx = ConnectionContext::new(peer, "tcp");
        let span = ctx.span();
        tokio::spawn(
            run_connection(stream, ctx.peer, dispatcher.clone(), max_message_bytes).instrument(span),
        );
    }
}

async fn run_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    max_message_bytes: usize,
) {
    debug!("Connection opened");
    let (reader, writer) = stream.into_split();
    let (tx, rx) = mpsc::channel::<Response>(16);

    let send_task = tokio::spawn(send_loop(writer, rx).in_current_span());
    let recv_task = tokio::spawn(
        receive_loop(reader, tx, dispatcher, peer, max_message_bytes).in_current_span(),
    );

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    debug!("Connection closed");
}

async fn send_loop(mut writer: OwnedWriteHalf, mut rx: mpsc::Receiver<Response>) {
    while let Some(response) = rx.recv().await {
        let mut line = match response.to_json() {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "Failed to encode response");
                continue;
            }
        };
        line.push('\n');

        if let Err(err) = writer.write_all(line.as_bytes()).await {
            debug!(%err, "Write failed");
            break;
        }
    }
}

async fn receive_loop(
    reader: OwnedReadHalf,
    tx: mpsc::Sender<Response>,
    dispatcher: Arc<Dispatcher>,
    peer: SocketAddr,
    max_message_bytes: usize,
) {
    if tx.send(Response::greeting()).await.is_err() {
        return;
    }

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    // One extra byte leaves room for the newline of a maximum-sized message
    let limit = max_message_bytes as u64 + 1;

    loop {
        buf.clear();
        match (&mut reader).take(limit).read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(%err, "Read failed");
                break;
            }
        }

        if buf.len() > max_message_bytes && buf.last() != Some(&b'\n') {
            warn!(max_message_bytes, "Message too large, closing connection");
            break;
        }

        let raw = String::from_utf8_lossy(&buf);
        debug!(raw = %raw.trim_end(), "Received message");

        let Some(response) = dispatcher.handle(&raw, peer) else {
            continue;
        };

        if tx.send(response).await.is_err() {
            break;
        }
    }
}
