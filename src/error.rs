use volc_tts_types::ProtocolError;

/// Session outcome errors. None of these are retried; the first one ends
/// the session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection closed before the session finished")]
    ConnectionClosed,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("server error {code}: {detail}")]
    Server { code: u32, detail: String },
    #[error("no audio data received")]
    EmptyResult,
    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
