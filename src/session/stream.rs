//! Session against the well-known stimulus-control endpoint.

use crate::config::Settings;
use crate::error::ClientResult;
use crate::protocol::Command;
use crate::session::RemoteSession;

/// A session with the single well-known stim peer.
///
/// Identical contract to [`RemoteSession`], but the endpoint defaults to
/// the hardwired stim address (`100.0.0.1:4610`) instead of being
/// supplied per call site. Override the host with [`connect_to`] or the
/// whole endpoint with [`connect_with`].
///
/// [`connect_to`]: StreamSession::connect_to
/// [`connect_with`]: StreamSession::connect_with
#[derive(Debug)]
pub struct StreamSession {
    inner: RemoteSession,
}

impl StreamSession {
    /// Open a session to the default stim endpoint.
    pub fn connect() -> ClientResult<Self> {
        Self::connect_with(Settings::default())
    }

    /// Open a session to `host` on the default stim port.
    pub fn connect_to(host: &str) -> ClientResult<Self> {
        let mut settings = Settings::default();
        settings.endpoint.host = host.to_string();
        Self::connect_with(settings)
    }

    /// Open a session with explicit settings.
    pub fn connect_with(settings: Settings) -> ClientResult<Self> {
        Ok(Self {
            inner: RemoteSession::connect_with(settings)?,
        })
    }

    /// Send a text command and wait for its reply as UTF-8 text.
    pub fn send(&mut self, command: &str) -> ClientResult<String> {
        self.inner.send(command)
    }

    /// Send a built command and wait for its reply as UTF-8 text.
    pub fn send_command(&mut self, command: &Command) -> ClientResult<String> {
        self.inner.send_command(command)
    }

    /// Send raw bytes and wait for the raw reply.
    pub fn send_raw(&mut self, message: &[u8]) -> ClientResult<Vec<u8>> {
        self.inner.send_raw(message)
    }

    /// Close the session. Idempotent.
    pub fn close(&mut self) {
        self.inner.close()
    }

    /// Whether the session currently holds an open connection.
    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}
