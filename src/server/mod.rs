mod session;
mod tcp;
mod ws;

pub use session::ConnectionContext;
pub use tcp::{DEFAULT_MAX_MESSAGE_BYTES, serve_tcp};
pub use ws::handle_connection;
