//! Session wrappers.
//!
//! Long-lived handles that hide connect/close details behind a single
//! send-and-get-reply call, plus a one-shot convenience send.

mod oneshot;
mod remote;
mod stream;

pub use oneshot::{send_once, send_once_with};
pub use remote::RemoteSession;
pub use stream::StreamSession;
