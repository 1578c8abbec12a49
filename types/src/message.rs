use std::fmt;

/// Coarse classification of a frame, carried in the high nibble of the
/// second header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgType {
    FullClientRequest,
    AudioOnlyClient,
    FullServerResponse,
    AudioOnlyServer,
    FrontEndResultServer,
    Error,
}

impl MsgType {
    pub(crate) fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0b0001 => Some(MsgType::FullClientRequest),
            0b0010 => Some(MsgType::AudioOnlyClient),
            0b1001 => Some(MsgType::FullServerResponse),
            0b1011 => Some(MsgType::AudioOnlyServer),
            0b1100 => Some(MsgType::FrontEndResultServer),
            0b1111 => Some(MsgType::Error),
            _ => None,
        }
    }

    pub(crate) fn nibble(self) -> u8 {
        match self {
            MsgType::FullClientRequest => 0b0001,
            MsgType::AudioOnlyClient => 0b0010,
            MsgType::FullServerResponse => 0b1001,
            MsgType::AudioOnlyServer => 0b1011,
            MsgType::FrontEndResultServer => 0b1100,
            MsgType::Error => 0b1111,
        }
    }
}

/// Fine-grained event within a server frame, carried as a big-endian i32
/// when the "with event" flag bit is set.
///
/// Codes this client does not know about map to `None` rather than failing
/// decode, so newer server events pass through the session loop as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventType {
    #[default]
    None,
    ConnectionStarted,
    ConnectionFailed,
    ConnectionFinished,
    SessionStarted,
    SessionCanceled,
    SessionFinished,
    SessionFailed,
    TtsSentenceStart,
    TtsSentenceEnd,
    TtsResponse,
}

impl EventType {
    pub fn from_code(code: i32) -> Self {
        match code {
            50 => EventType::ConnectionStarted,
            51 => EventType::ConnectionFailed,
            52 => EventType::ConnectionFinished,
            150 => EventType::SessionStarted,
            151 => EventType::SessionCanceled,
            152 => EventType::SessionFinished,
            153 => EventType::SessionFailed,
            350 => EventType::TtsSentenceStart,
            351 => EventType::TtsSentenceEnd,
            352 => EventType::TtsResponse,
            _ => EventType::None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            EventType::None => 0,
            EventType::ConnectionStarted => 50,
            EventType::ConnectionFailed => 51,
            EventType::ConnectionFinished => 52,
            EventType::SessionStarted => 150,
            EventType::SessionCanceled => 151,
            EventType::SessionFinished => 152,
            EventType::SessionFailed => 153,
            EventType::TtsSentenceStart => 350,
            EventType::TtsSentenceEnd => 351,
            EventType::TtsResponse => 352,
        }
    }
}

/// One decoded frame. Immutable once produced by the codec.
///
/// The payload is raw audio bytes iff `msg_type == AudioOnlyServer`; for
/// every other type (including `Error`) it is a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub msg_type: MsgType,
    pub event: EventType,
    pub session_id: Option<String>,
    pub connect_id: Option<String>,
    pub sequence: Option<i32>,
    pub error_code: Option<u32>,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(msg_type: MsgType) -> Self {
        Self {
            msg_type,
            event: EventType::None,
            session_id: None,
            connect_id: None,
            sequence: None,
            error_code: None,
            payload: Vec::new(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}/{:?} ({} payload bytes)",
            self.msg_type,
            self.event,
            self.payload.len()
        )?;
        if let Some(code) = self.error_code {
            write!(f, " error_code={}", code)?;
        }
        Ok(())
    }
}
