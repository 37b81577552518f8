mod dispatcher;
mod error;
pub mod request;
pub mod response;

pub use dispatcher::{DEFAULT_KEEPALIVE, Dispatcher};
pub use error::ErrorCode;
pub use request::{Method, Request};
pub use response::{PROTOCOL_VERSION, Payload, Response};
