//! One-shot send: connect, exchange once, close.

use crate::config::Settings;
use crate::error::ClientResult;
use crate::session::RemoteSession;

/// Open a connection to `host:port`, perform exactly one exchange, and
/// close the connection. No state persists between calls.
pub fn send_once(host: &str, port: u16, command: &str) -> ClientResult<String> {
    let mut session = RemoteSession::connect(host, port)?;
    let reply = session.send(command);
    session.close();
    reply
}

/// One-shot send with explicit settings.
pub fn send_once_with(settings: Settings, command: &str) -> ClientResult<String> {
    let mut session = RemoteSession::connect_with(settings)?;
    let reply = session.send(command);
    session.close();
    reply
}
