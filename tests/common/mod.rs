#![allow(dead_code)]

use futures_util::StreamExt;
use masterserver::protocol::Dispatcher;
use masterserver::server::serve_tcp;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestServer {
    pub tcp_addr: SocketAddr,
    pub http_addr: SocketAddr,
    pub dispatcher: Arc<Dispatcher>,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.http_addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.http_addr, path)
    }
}

pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with(Duration::from_secs(20), 64 * 1024).await
}

pub async fn spawn_test_server_with(keepalive: Duration, max_message_bytes: usize) -> TestServer {
    let dispatcher = Arc::new(Dispatcher::new(keepalive));

    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let tcp_addr = tcp_listener.local_addr().unwrap();
    tokio::spawn(serve_tcp(tcp_listener, dispatcher.clone(), max_message_bytes));

    let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_addr = http_listener.local_addr().unwrap();
    let http_dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        masterserver::serve_http(http_listener, http_dispatcher)
            .await
            .unwrap();
    });

    TestServer {
        tcp_addr,
        http_addr,
        dispatcher,
    }
}

/// A game client speaking newline-delimited JSON over TCP
pub struct TcpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TcpClient {
    /// Connect and consume the greeting
    pub async fn connect(server: &TestServer) -> Self {
        let mut client = Self::connect_raw(server).await;
        let greeting = client.recv().await;
        assert_eq!(greeting["keeperfx"], true);
        client
    }

    pub async fn connect_raw(server: &TestServer) -> Self {
        let stream = TcpStream::connect(server.tcp_addr)
            .await
            .expect("Failed to connect");
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub async fn send(&mut self, message: Value) {
        self.send_raw(&message.to_string()).await;
    }

    pub async fn send_raw(&mut self, raw: &str) {
        self.writer.write_all(raw.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    pub async fn recv(&mut self) -> Value {
        let mut line = String::new();
        let read = tokio::time::timeout(RECV_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for response")
            .unwrap();
        assert!(read > 0, "Connection closed");
        assert!(line.ends_with('\n'));
        serde_json::from_str(&line).unwrap()
    }

    pub async fn request(&mut self, message: Value) -> Value {
        self.send(message).await;
        self.recv().await
    }

    /// True once the server has closed the connection
    pub async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        matches!(
            tokio::time::timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await,
            Ok(Ok(0)) | Ok(Err(_))
        )
    }
}

pub async fn connect_ws(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

pub fn text_msg(message: Value) -> Message {
    Message::Text(message.to_string().into())
}

pub async fn recv_ws(ws: &mut WsStream) -> Value {
    let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("Timed out waiting for response")
        .unwrap()
        .unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}
