pub mod codec;
pub mod message;

pub use codec::{decode, encode_full_client_request, ProtocolError};
pub use message::{EventType, Message, MsgType};
