//! Client for a unidirectional streaming speech-synthesis endpoint: one
//! request goes out over a persistent WebSocket, audio chunks and control
//! events stream back until the server finishes or fails the session.

mod client;
mod error;
mod session;
mod sink;

pub use volc_tts_types as types;

pub use client::{
    resource_id_for_voice, Config, ConfigBuilder, Connection, SynthesisParams, SynthesisRequest,
};
pub use error::Error;
pub use session::{FrameSource, Session, SessionState, Transport};
pub use sink::AudioSink;

/// Runs one synthesis session end to end: connect, send the request, drive
/// the receive loop, and hand back the accumulated audio bytes.
pub async fn synthesize(config: &Config, params: &SynthesisParams) -> Result<Vec<u8>, Error> {
    let mut conn = Connection::open(config, params.voice()).await?;
    synthesize_over(&mut conn, params).await
}

/// Runs one session over an already-open transport. The transport is
/// closed exactly once on every exit path, whether the session finishes,
/// the server reports an error, or the transport itself fails.
pub async fn synthesize_over<T: Transport>(
    conn: &mut T,
    params: &SynthesisParams,
) -> Result<Vec<u8>, Error> {
    let result = drive(conn, params).await;
    conn.close().await;
    result
}

async fn drive<T: Transport>(conn: &mut T, params: &SynthesisParams) -> Result<Vec<u8>, Error> {
    let body = SynthesisRequest::build(params)?.to_bytes()?;
    conn.send(types::encode_full_client_request(&body)).await?;
    let mut session = Session::new();
    session.run(conn).await?;
    session.into_audio()
}
