//! Blocking TCP connection to a stim server.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::MAX_MESSAGE_SIZE;
use crate::error::{ClientError, ClientResult};

/// One open duplex byte channel to a (host, port) endpoint.
///
/// All I/O is blocking. The connection is owned exclusively by whoever
/// created it; dropping it closes the socket.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    host: String,
    port: u16,
    reply_timeout: Duration,
    closed: bool,
}

impl Connection {
    /// Establish a TCP connection to `host:port`.
    ///
    /// Each resolved address is tried in turn with `connect_timeout`;
    /// the last failure is reported if none succeeds.
    pub fn open(host: &str, port: u16, connect_timeout: Duration) -> ClientResult<Self> {
        let addrs: Vec<_> = (host, port)
            .to_socket_addrs()
            .map_err(|e| ClientError::Connect {
                message: format!("Failed to resolve '{}:{}': {}", host, port, e),
            })?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    // Command messages are small; don't let Nagle hold them.
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(error = %e, "Failed to set TCP_NODELAY");
                    }
                    debug!(host, port, %addr, "Connected");
                    return Ok(Self {
                        stream,
                        host: host.to_string(),
                        port,
                        reply_timeout: Duration::ZERO,
                        closed: false,
                    });
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(ClientError::Connect {
            message: match last_err {
                Some(e) => format!("Failed to connect to '{}:{}': {}", host, port, e),
                None => format!("No addresses found for '{}:{}'", host, port),
            },
        })
    }

    /// Set the timeout applied to each blocking read.
    pub fn set_reply_timeout(&mut self, timeout: Duration) -> ClientResult<()> {
        self.stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| ClientError::Read {
                message: format!("Failed to set read timeout: {}", e),
            })?;
        self.reply_timeout = timeout;
        Ok(())
    }

    /// Write all of `bytes`, looping over partial writes.
    pub fn write_all(&mut self, bytes: &[u8]) -> ClientResult<()> {
        self.stream.write_all(bytes).map_err(|e| ClientError::Write {
            message: format!("Write to '{}:{}' failed: {}", self.host, self.port, e),
        })?;
        self.stream.flush().map_err(|e| ClientError::Write {
            message: format!("Flush to '{}:{}' failed: {}", self.host, self.port, e),
        })
    }

    /// Read whatever is available into `buf`, up to `min(buf.len(), 16384)`
    /// bytes. Returns 0 on graceful peer close. A read timeout maps to
    /// `Timeout`; framing is left to the caller.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> ClientResult<usize> {
        let cap = buf.len().min(MAX_MESSAGE_SIZE);
        loop {
            match self.stream.read(&mut buf[..cap]) {
                Ok(n) => return Ok(n),
                // WouldBlock is what Unix returns for an expired
                // SO_RCVTIMEO, TimedOut is what Windows returns.
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                    return Err(ClientError::Timeout {
                        millis: self.reply_timeout.as_millis() as u64,
                    });
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ClientError::Read {
                        message: format!("Read from '{}:{}' failed: {}", self.host, self.port, e),
                    });
                }
            }
        }
    }

    /// Close the connection. Idempotent: closing an already-closed
    /// connection is a no-op success, and shutdown errors are swallowed.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // Descriptor already invalid or peer already gone.
            debug!(host = %self.host, port = self.port, error = %e, "Shutdown ignored");
        } else {
            debug!(host = %self.host, port = self.port, "Connection closed");
        }
    }

    /// The remote host this connection was opened against.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The remote port this connection was opened against.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
