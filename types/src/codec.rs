//! Binary framing for the speech service's v3 protocol.
//!
//! Every frame starts with a four-byte header:
//!
//! ```text
//! | version | header size | msg type | flags | serialization | compression | reserved |
//! |  4 bits |      4 bits |   4 bits | 4 bits|        4 bits |      4 bits |   8 bits |
//! ```
//!
//! Header size is counted in 4-byte words. Flag bits 0-1 carry the sequence
//! discipline (`0b01` and `0b11` mean a big-endian i32 sequence number
//! follows the header); flag bit 2 means a big-endian i32 event code
//! follows. Connection-class events carry an optional connect id, all other
//! nonzero events carry a session id, both as a u32 length prefix plus
//! UTF-8 bytes. Error frames carry a u32 status code before the payload.
//! The payload itself is a u32 length prefix plus raw bytes.

use bytes::{Buf, BufMut, BytesMut};

use crate::message::{EventType, Message, MsgType};

const PROTOCOL_VERSION: u8 = 0b0001;
const HEADER_WORDS: u8 = 0b0001;
const SERIALIZATION_JSON: u8 = 0b0001;

const FLAG_SEQ_MASK: u8 = 0b0011;
const FLAG_WITH_EVENT: u8 = 0b0100;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame truncated while reading {0}")]
    Truncated(&'static str),
    #[error("unknown message type 0b{0:04b}")]
    UnknownMsgType(u8),
    #[error("header size {0} is smaller than the fixed header")]
    InvalidHeaderSize(usize),
    #[error("declared {what} length {len} overruns the frame")]
    LengthOverrun { what: &'static str, len: usize },
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
}

/// Wraps an opaque payload (the serialized request body) as an outbound
/// full-client frame with no sequence number and no event.
pub fn encode_full_client_request(payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(8 + payload.len());
    buf.put_u8(PROTOCOL_VERSION << 4 | HEADER_WORDS);
    buf.put_u8(MsgType::FullClientRequest.nibble() << 4);
    buf.put_u8(SERIALIZATION_JSON << 4);
    buf.put_u8(0);
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf.to_vec()
}

/// Parses one inbound frame into a [`Message`].
///
/// Unknown message types fail decode; unknown event codes do not (they map
/// to [`EventType::None`] and flow through untouched).
pub fn decode(data: &[u8]) -> Result<Message, ProtocolError> {
    let mut buf = data;
    if buf.remaining() < 4 {
        return Err(ProtocolError::Truncated("header"));
    }
    let header_size = ((buf[0] & 0x0f) as usize) * 4;
    if header_size < 4 {
        // A smaller value would leave the cursor inside the fixed header
        // and re-read those bytes as body fields.
        return Err(ProtocolError::InvalidHeaderSize(header_size));
    }
    let type_and_flags = buf[1];
    let msg_type = MsgType::from_nibble(type_and_flags >> 4)
        .ok_or(ProtocolError::UnknownMsgType(type_and_flags >> 4))?;
    let flags = type_and_flags & 0x0f;
    // Bytes 2 and 3 (serialization, compression, reserved) are not
    // interpreted: the server always answers JSON, uncompressed.
    if buf.remaining() < header_size {
        return Err(ProtocolError::Truncated("header extension"));
    }
    buf.advance(header_size);

    let mut msg = Message::new(msg_type);
    if matches!(flags & FLAG_SEQ_MASK, 0b01 | 0b11) {
        msg.sequence = Some(read_i32(&mut buf, "sequence")?);
    }
    if flags & FLAG_WITH_EVENT != 0 {
        let code = read_i32(&mut buf, "event")?;
        msg.event = EventType::from_code(code);
        match code {
            0 => {}
            // Connection-class events are not bound to a session.
            1 | 2 | 50 | 51 | 52 => {
                msg.connect_id = Some(read_string(&mut buf, "connect id")?);
            }
            _ => {
                msg.session_id = Some(read_string(&mut buf, "session id")?);
            }
        }
    }
    if msg_type == MsgType::Error {
        msg.error_code = Some(read_u32(&mut buf, "error code")?);
    }
    msg.payload = read_prefixed(&mut buf, "payload")?;
    Ok(msg)
}

fn read_i32(buf: &mut &[u8], what: &'static str) -> Result<i32, ProtocolError> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::Truncated(what));
    }
    Ok(buf.get_i32())
}

fn read_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, ProtocolError> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::Truncated(what));
    }
    Ok(buf.get_u32())
}

fn read_prefixed(buf: &mut &[u8], what: &'static str) -> Result<Vec<u8>, ProtocolError> {
    let len = read_u32(buf, what)? as usize;
    if buf.remaining() < len {
        return Err(ProtocolError::LengthOverrun { what, len });
    }
    Ok(buf.copy_to_bytes(len).to_vec())
}

fn read_string(buf: &mut &[u8], what: &'static str) -> Result<String, ProtocolError> {
    let raw = read_prefixed(buf, what)?;
    String::from_utf8(raw).map_err(|_| ProtocolError::InvalidUtf8(what))
}
