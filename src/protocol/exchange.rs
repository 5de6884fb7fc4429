//! One request/reply round trip over a connection.

use tracing::{debug, trace};

use crate::config::MAX_MESSAGE_SIZE;
use crate::error::{ClientError, ClientResult, ProtocolErrorKind};
use crate::protocol::framing::{encode, FrameDecoder};
use crate::transport::Connection;

/// Send one framed request and block until its framed reply is fully
/// assembled.
///
/// The `&mut` borrows enforce the one-outstanding-exchange invariant
/// within a thread: no second request can be issued on this connection
/// until the reply (or a failure) comes back. The decoder must be the
/// one paired with this connection so leftover bytes carry across
/// exchanges and each reply matches the most recent request.
///
/// On `Timeout` or any read/write failure the connection state is
/// undefined; the caller should close and reopen.
pub fn exchange(
    conn: &mut Connection,
    decoder: &mut FrameDecoder,
    request: &[u8],
    terminator: u8,
    max_size: usize,
) -> ClientResult<Vec<u8>> {
    // Encode first so an oversize request writes nothing.
    let framed = encode(request, terminator, max_size)?;

    debug!(
        host = conn.host(),
        port = conn.port(),
        bytes = framed.len(),
        "Sending request"
    );
    conn.write_all(&framed)?;

    // A previous exchange may have left a complete reply buffered.
    if let Some(reply) = decoder.try_extract()? {
        debug!(bytes = reply.len(), "Reply assembled from buffered bytes");
        return Ok(reply);
    }

    let mut chunk = [0u8; MAX_MESSAGE_SIZE];
    loop {
        let n = conn.read_chunk(&mut chunk)?;
        if n == 0 {
            return Err(ClientError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            });
        }
        trace!(bytes = n, "Read chunk");
        if let Some(reply) = decoder.push(&chunk[..n])? {
            debug!(bytes = reply.len(), "Reply assembled");
            return Ok(reply);
        }
    }
}
