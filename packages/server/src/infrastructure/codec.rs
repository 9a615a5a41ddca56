//! Wire codec for the relay protocol.
//!
//! The TCP stream is cut into frames by a 4-byte big-endian length prefix
//! ([`frame_codec`]). Inside a frame:
//!
//! ```text
//! client -> server   first frame: raw UTF-8 display name (handshake)
//!                    every later frame: one raw UTF-8 input line
//! server -> client   every frame: one JSON envelope, tagged by "type"
//! ```
//!
//! A zero-length frame from a client means it is leaving.

use bytes::Bytes;
use thiserror::Error;
use tokio_util::codec::LengthDelimitedCodec;

use crate::domain::Envelope;

/// Largest accepted frame payload.
pub const MAX_FRAME_LENGTH: usize = 64 * 1024;

/// Codec error for a single frame; never fatal to the connection.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame has no payload
    #[error("malformed envelope: empty payload")]
    Empty,

    /// The frame is not a valid envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    /// The frame is not valid UTF-8 text
    #[error("malformed envelope: {0}")]
    MalformedText(#[from] std::str::Utf8Error),
}

/// Framing used on both sides of every connection.
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .max_frame_length(MAX_FRAME_LENGTH)
        .big_endian()
        .new_codec()
}

/// Serialize an envelope into one frame payload.
pub fn encode_envelope(envelope: &Envelope) -> Result<Bytes, CodecError> {
    Ok(Bytes::from(serde_json::to_vec(envelope)?))
}

/// Parse one frame payload into an envelope.
pub fn decode_envelope(payload: &[u8]) -> Result<Envelope, CodecError> {
    if payload.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(serde_json::from_slice(payload)?)
}

/// Frame payload for one line of client input (or the handshake name).
pub fn encode_text(text: &str) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}

/// Read a client frame as UTF-8 text.
pub fn decode_text(payload: &[u8]) -> Result<&str, CodecError> {
    if payload.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(std::str::from_utf8(payload)?)
}
