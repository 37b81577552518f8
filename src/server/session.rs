use std::net::SocketAddr;
use tracing::{Span, info_span};
use uuid::Uuid;

/// Identity of one client connection, carried on every log line it produces
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub id: Uuid,
    pub peer: SocketAddr,
    pub transport: &'static str,
}

impl ConnectionContext {
    pub fn new(peer: SocketAddr, transport: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            transport,
        }
    }

    pub fn span(&self) -> Span {
        info_span!(
            "connection",
            id = %self.id,
            peer = %self.peer,
            transport = self.transport
        )
    }
}
