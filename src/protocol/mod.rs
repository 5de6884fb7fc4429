//! Wire protocol module.
//!
//! Defines command building, message framing, and the request/reply
//! exchange for socket communication.
//!
//! ## Wire Format
//!
//! Messages are terminator-delimited ASCII:
//! ```text
//! [payload (<= 16383 bytes)][terminator byte]
//! ```

mod command;
mod exchange;
mod framing;

pub use command::Command;
pub use exchange::exchange;
pub use framing::{encode, FrameDecoder};
