//! Long-lived session against a caller-chosen stim endpoint.

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{ClientError, ClientResult, ProtocolErrorKind};
use crate::protocol::{exchange, Command, FrameDecoder};
use crate::transport::Connection;

/// One open connection paired with its frame decoder.
///
/// The pairing matters: leftover reply bytes live in the decoder, so
/// the two are created and torn down together.
#[derive(Debug)]
struct Link {
    conn: Connection,
    decoder: FrameDecoder,
}

/// A long-lived session with a stimulus-control server.
///
/// Hides connect/close details behind a single send-and-get-reply call.
/// Lifecycle: `connect` moves the session to connected, `close` (or any
/// fatal exchange error) moves it back; `send` is only valid while
/// connected and fails with `NotInitialized` otherwise.
///
/// Not internally synchronized. A session must not be shared across
/// threads without external locking; at most one request may be in
/// flight per connection.
#[derive(Debug)]
pub struct RemoteSession {
    settings: Settings,
    link: Option<Link>,
}

impl RemoteSession {
    /// Open a session to `host:port` with default settings.
    pub fn connect(host: &str, port: u16) -> ClientResult<Self> {
        let mut settings = Settings::default();
        settings.endpoint.host = host.to_string();
        settings.endpoint.port = port;
        Self::connect_with(settings)
    }

    /// Open a session with explicit settings.
    pub fn connect_with(settings: Settings) -> ClientResult<Self> {
        settings.validate()?;
        let link = open_link(&settings)?;
        info!(
            host = %settings.endpoint.host,
            port = settings.endpoint.port,
            "Session connected"
        );
        Ok(Self {
            settings,
            link: Some(link),
        })
    }

    /// Send a text command and wait for its reply as UTF-8 text.
    pub fn send(&mut self, command: &str) -> ClientResult<String> {
        let reply = self.send_raw(command.as_bytes())?;
        String::from_utf8(reply).map_err(|e| ClientError::Protocol {
            kind: ProtocolErrorKind::InvalidReply {
                message: format!("Reply is not valid UTF-8: {}", e),
            },
        })
    }

    /// Send a built command and wait for its reply as UTF-8 text.
    pub fn send_command(&mut self, command: &Command) -> ClientResult<String> {
        self.send(&command.render())
    }

    /// Send raw bytes and wait for the raw reply.
    ///
    /// A fatal error (write/read failure, timeout, peer close) poisons
    /// the connection: it is torn down and subsequent sends fail with
    /// `NotInitialized` until the caller reconnects.
    pub fn send_raw(&mut self, message: &[u8]) -> ClientResult<Vec<u8>> {
        let link = self.link.as_mut().ok_or(ClientError::NotInitialized)?;

        let result = exchange(
            &mut link.conn,
            &mut link.decoder,
            message,
            self.settings.terminator_byte(),
            self.settings.limits.max_message_size,
        );

        match result {
            Ok(reply) => Ok(reply),
            Err(e) => {
                if e.is_fatal() {
                    warn!(
                        host = %self.settings.endpoint.host,
                        port = self.settings.endpoint.port,
                        error = %e,
                        "Exchange failed, closing poisoned connection"
                    );
                    if let Some(mut link) = self.link.take() {
                        link.conn.close();
                    }
                }
                Err(e)
            }
        }
    }

    /// Close the session. Idempotent: closing an unopened or
    /// already-closed session is a no-op success.
    pub fn close(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.conn.close();
            debug!(
                host = %self.settings.endpoint.host,
                port = self.settings.endpoint.port,
                "Session closed"
            );
        }
    }

    /// Whether the session currently holds an open connection.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// The settings this session was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Drop for RemoteSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_link(settings: &Settings) -> ClientResult<Link> {
    let mut conn = Connection::open(
        &settings.endpoint.host,
        settings.endpoint.port,
        settings.connect_timeout(),
    )?;
    conn.set_reply_timeout(settings.reply_timeout())?;
    let decoder = FrameDecoder::new(
        settings.terminator_byte(),
        settings.limits.max_message_size,
    );
    Ok(Link { conn, decoder })
}
