use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use volc_tts_types as types;

use crate::error::Error;
use crate::session::{FrameSource, Transport};

mod config;
mod consts;
mod request;
mod utils;

pub use config::{Config, ConfigBuilder};
pub use request::{SynthesisParams, SynthesisRequest};
pub use utils::resource_id_for_voice;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One duplex channel to the speech endpoint, exclusively owned by a single
/// session for its whole lifetime.
pub struct Connection {
    ws: Option<WsStream>,
}

impl Connection {
    /// Performs the handshake with the identity headers derived from
    /// `config` and the requested voice.
    pub async fn open(config: &Config, voice: &str) -> Result<Self, Error> {
        let request = utils::build_request(config, voice)?;
        tracing::info!(endpoint = config.endpoint(), "connecting");
        let (ws, response) = tokio_tungstenite::connect_async(request).await?;
        match response
            .headers()
            .get(consts::LOGID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            Some(logid) => tracing::info!(logid, "connected"),
            None => tracing::info!("connected"),
        }
        Ok(Self { ws: Some(ws) })
    }
}

impl Transport for Connection {
    /// Writes one raw frame, waiting until it is flushed.
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), Error> {
        let ws = self.ws.as_mut().ok_or(Error::ConnectionClosed)?;
        ws.send(WsMessage::Binary(frame)).await?;
        Ok(())
    }

    /// Closes the channel. Only the first call has any effect.
    async fn close(&mut self) {
        if let Some(mut ws) = self.ws.take() {
            if let Err(err) = ws.close(None).await {
                tracing::debug!(error = %err, "error while closing connection");
            }
            tracing::info!("connection closed");
        }
    }
}

impl FrameSource for Connection {
    /// Waits for the next binary frame and decodes it. Control frames the
    /// protocol does not carry payloads on (ping, pong, text) are skipped.
    async fn receive(&mut self) -> Result<types::Message, Error> {
        let ws = self.ws.as_mut().ok_or(Error::ConnectionClosed)?;
        loop {
            match ws.next().await {
                None => return Err(Error::ConnectionClosed),
                Some(Err(err)) => return Err(err.into()),
                Some(Ok(WsMessage::Binary(data))) => return Ok(types::decode(&data)?),
                Some(Ok(WsMessage::Close(reason))) => {
                    tracing::info!(?reason, "server closed the connection");
                    return Err(Error::ConnectionClosed);
                }
                Some(Ok(other)) => {
                    tracing::debug!(frame = ?other, "skipping non-binary frame");
                }
            }
        }
    }
}
