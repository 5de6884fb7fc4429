//! Byte-stream transport.
//!
//! Blocking TCP with short-read handling; framing lives one layer up.

mod connection;

pub use connection::Connection;
