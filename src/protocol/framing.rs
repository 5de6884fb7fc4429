//! Wire format for message framing.
//!
//! Messages are terminator-delimited ASCII:
//! ```text
//! [payload][1 byte: terminator]
//! ```
//! The terminator byte is owned by the peer protocol and configurable;
//! the default is a newline.

use crate::error::{ClientError, ClientResult, ProtocolErrorKind};

/// Encode a message for the wire by appending the terminator.
///
/// Rejects messages whose framed size exceeds `max_size` and messages
/// that already contain the terminator byte. Nothing is written on
/// rejection.
pub fn encode(message: &[u8], terminator: u8, max_size: usize) -> ClientResult<Vec<u8>> {
    let framed_len = message.len() + 1;
    if framed_len > max_size {
        return Err(ClientError::Protocol {
            kind: ProtocolErrorKind::MessageTooLarge {
                size: framed_len,
                max: max_size,
            },
        });
    }

    if message.contains(&terminator) {
        return Err(ClientError::Protocol {
            kind: ProtocolErrorKind::EmbeddedTerminator { terminator },
        });
    }

    let mut framed = Vec::with_capacity(framed_len);
    framed.extend_from_slice(message);
    framed.push(terminator);
    Ok(framed)
}

/// Incremental decoder assembling terminator-delimited messages from
/// read chunks.
///
/// Bytes left over after a terminator are kept for the next message, so
/// a decoder must live as long as its connection: replies stay matched
/// to requests even when the peer's bytes arrive split or coalesced
/// arbitrarily.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    terminator: u8,
    max_size: usize,
}

impl FrameDecoder {
    /// Create a decoder for the given terminator and size cap.
    pub fn new(terminator: u8, max_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            terminator,
            max_size,
        }
    }

    /// Append newly read bytes and try to extract one complete message.
    ///
    /// Returns `Ok(Some(message))` (terminator stripped) when a full
    /// message is assembled, `Ok(None)` when more data is needed. An
    /// empty reply (bare terminator) decodes to `Some(vec![])`.
    pub fn push(&mut self, new_bytes: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.buf.extend_from_slice(new_bytes);
        self.try_extract()
    }

    /// Try to extract a message from bytes already buffered.
    pub fn try_extract(&mut self) -> ClientResult<Option<Vec<u8>>> {
        if let Some(pos) = self.buf.iter().position(|&b| b == self.terminator) {
            let mut message: Vec<u8> = self.buf.drain(..=pos).collect();
            message.pop(); // drop the terminator
            return Ok(Some(message));
        }

        // No terminator yet. A partial frame at the cap can never
        // complete, and the fatal kind tells callers the connection is
        // unusable (the request already went out).
        if self.buf.len() >= self.max_size {
            return Err(ClientError::Protocol {
                kind: ProtocolErrorKind::ReplyTooLarge {
                    size: self.buf.len(),
                    max: self.max_size,
                },
            });
        }

        Ok(None)
    }

    /// Number of buffered bytes not yet part of a complete message.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Discard buffered bytes. Used when a connection is poisoned.
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}
