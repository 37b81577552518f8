use crate::protocol::DEFAULT_KEEPALIVE;
use crate::server::DEFAULT_MAX_MESSAGE_BYTES;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "masterserver", about = "Lobby discovery server for multiplayer game sessions")]
pub struct Args {
    /// Address to listen on for game clients
    #[arg(default_value = "127.0.0.1")]
    pub ip: IpAddr,

    /// TCP port for game clients (0 picks a free port)
    #[arg(default_value_t = 0)]
    pub port: u16,

    /// Log every request, not just lobby changes
    #[arg(short, long, env = "MASTERSERVER_VERBOSE")]
    pub verbose: bool,

    /// Also serve HTTP (health, lobby list, WebSocket) on this port
    #[arg(long, env = "MASTERSERVER_HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Seconds without a heartbeat before a lobby is dropped
    #[arg(long, env = "MASTERSERVER_KEEPALIVE_SECS", default_value_t = DEFAULT_KEEPALIVE.as_secs())]
    pub keepalive_secs: u64,

    /// Connections sending a longer line are closed
    #[arg(long, env = "MASTERSERVER_MAX_MESSAGE_BYTES", default_value_t = DEFAULT_MAX_MESSAGE_BYTES)]
    pub max_message_bytes: usize,
}

pub struct Config {
    pub ip: IpAddr,
    pub port: u16,
    pub verbose: bool,
    pub http_port: Option<u16>,
    pub keepalive: Duration,
    pub max_message_bytes: usize,
}

impl Config {
    /// Read `.env`, the environment and the command line
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Args::parse().into()
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http_port.map(|port| SocketAddr::new(self.ip, port))
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            ip: args.ip,
            port: args.port,
            verbose: args.verbose,
            http_port: args.http_port,
            keepalive: Duration::from_secs(args.keepalive_secs),
            max_message_bytes: args.max_message_bytes,
        }
    }
}
