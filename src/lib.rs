//! Stim Socket Client Library
//!
//! This crate provides a blocking TCP client for sending commands to a
//! remote experiment-control stimulus server ("stim") and receiving its
//! replies, as used in neuroscience and behavioral experiment rigs.
//!
//! Messages are terminator-delimited ASCII, at most 16384 bytes framed,
//! with strictly one request in flight per connection.
//!
//! ```no_run
//! use stimsock::RemoteSession;
//!
//! # fn main() -> stimsock::ClientResult<()> {
//! let mut session = RemoteSession::connect("stim.lab.local", 4610)?;
//! let reply = session.send("PING")?;
//! session.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use config::{Settings, DEFAULT_STIM_PORT, MAX_MESSAGE_SIZE, STIM_INET_ADDRESS};
pub use error::{ClientError, ClientResult, ProtocolErrorKind};
pub use protocol::Command;
pub use session::{send_once, send_once_with, RemoteSession, StreamSession};
pub use transport::Connection;
