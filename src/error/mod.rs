//! Error handling for the stim client.

mod types;

pub use types::{ClientError, ClientResult, ProtocolErrorKind};
