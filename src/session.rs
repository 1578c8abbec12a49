use volc_tts_types::{EventType, Message, MsgType};

use crate::error::Error;

/// Anything the session loop can pull decoded frames from. Implemented by
/// [`crate::Connection`] and by scripted sources in tests, so the state
/// machine runs without a network endpoint.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    async fn receive(&mut self) -> Result<Message, Error>;
}

/// The full connection surface the session driver needs. Keeping it a
/// trait lets the driver's release discipline run against scripted
/// transports as well as a live [`crate::Connection`].
#[allow(async_fn_in_trait)]
pub trait Transport: FrameSource {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), Error>;

    /// Releases the channel. Must be safe to call more than once.
    async fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Awaiting,
    Streaming,
    Finished,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Failed)
    }
}

/// One synthesis exchange: classifies inbound frames, accumulates audio in
/// delivery order, and stops on the first terminal condition.
pub struct Session {
    state: SessionState,
    audio: Vec<u8>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Awaiting,
            audio: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drives the receive loop until the session finishes or fails. There
    /// is no bound on the number of frames before `SessionFinished`.
    pub async fn run<S: FrameSource>(&mut self, source: &mut S) -> Result<(), Error> {
        while !self.state.is_terminal() {
            let msg = match source.receive().await {
                Ok(msg) => msg,
                Err(err) => {
                    self.state = SessionState::Failed;
                    return Err(err);
                }
            };
            tracing::debug!(frame = %msg, "received frame");
            self.apply(msg)?;
        }
        Ok(())
    }

    fn apply(&mut self, msg: Message) -> Result<(), Error> {
        match (msg.msg_type, msg.event) {
            (MsgType::AudioOnlyServer, _) => {
                self.audio.extend_from_slice(&msg.payload);
                self.state = SessionState::Streaming;
            }
            (MsgType::FullServerResponse, EventType::TtsSentenceEnd) => {
                // Boundary marker only; the buffer and state stay put.
                tracing::info!(
                    sentence = %String::from_utf8_lossy(&msg.payload),
                    "sentence finished"
                );
            }
            (MsgType::FullServerResponse, EventType::SessionFinished) => {
                self.state = SessionState::Finished;
            }
            (MsgType::Error, _) => {
                self.state = SessionState::Failed;
                return Err(Error::Server {
                    code: msg.error_code.unwrap_or(0),
                    detail: String::from_utf8_lossy(&msg.payload).into_owned(),
                });
            }
            _ => {
                // Unrecognized but well-formed combinations pass through so
                // newer server events don't break older clients.
                tracing::debug!(frame = %msg, "ignoring frame");
            }
        }
        Ok(())
    }

    /// Hands out the accumulated audio once the loop has completed.
    pub fn into_audio(self) -> Result<Vec<u8>, Error> {
        if self.audio.is_empty() {
            return Err(Error::EmptyResult);
        }
        Ok(self.audio)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedSource {
        frames: VecDeque<Result<Message, Error>>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Result<Message, Error>>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        async fn receive(&mut self) -> Result<Message, Error> {
            self.frames
                .pop_front()
                .unwrap_or(Err(Error::ConnectionClosed))
        }
    }

    fn audio(payload: &[u8]) -> Result<Message, Error> {
        let mut msg = Message::new(MsgType::AudioOnlyServer);
        msg.event = EventType::TtsResponse;
        msg.payload = payload.to_vec();
        Ok(msg)
    }

    fn control(event: EventType) -> Result<Message, Error> {
        let mut msg = Message::new(MsgType::FullServerResponse);
        msg.event = event;
        msg.payload = b"{}".to_vec();
        Ok(msg)
    }

    fn server_error(code: u32, detail: &str) -> Result<Message, Error> {
        let mut msg = Message::new(MsgType::Error);
        msg.error_code = Some(code);
        msg.payload = detail.as_bytes().to_vec();
        Ok(msg)
    }

    #[tokio::test]
    async fn concatenates_audio_in_delivery_order() {
        let mut source = ScriptedSource::new(vec![
            audio(b"one"),
            control(EventType::TtsSentenceEnd),
            audio(b"two"),
            audio(b"three"),
            control(EventType::SessionFinished),
        ]);
        let mut session = Session::new();
        session.run(&mut source).await.unwrap();
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.into_audio().unwrap(), b"onetwothree");
    }

    #[tokio::test]
    async fn sentence_end_never_touches_buffer_or_state() {
        let mut source = ScriptedSource::new(vec![control(EventType::TtsSentenceEnd)]);
        let mut session = Session::new();
        let msg = source.receive().await.unwrap();
        session.apply(msg).unwrap();
        assert_eq!(session.state(), SessionState::Awaiting);

        let mut source = ScriptedSource::new(vec![
            audio(b"pcm"),
            control(EventType::TtsSentenceEnd),
            control(EventType::SessionFinished),
        ]);
        let mut session = Session::new();
        session.run(&mut source).await.unwrap();
        assert_eq!(session.into_audio().unwrap(), b"pcm");
    }

    #[tokio::test]
    async fn error_frame_fails_session_and_stops_the_loop() {
        let mut source = ScriptedSource::new(vec![
            audio(b"partial"),
            server_error(55000000, "quota exceeded"),
            audio(b"never read"),
        ]);
        let mut session = Session::new();
        let err = session.run(&mut source).await.unwrap_err();
        assert!(
            matches!(err, Error::Server { code: 55000000, ref detail } if detail == "quota exceeded")
        );
        assert_eq!(session.state(), SessionState::Failed);
        // The frame after the error was never consumed.
        assert_eq!(source.frames.len(), 1);
    }

    #[tokio::test]
    async fn finished_without_audio_is_an_empty_result() {
        let mut source = ScriptedSource::new(vec![control(EventType::SessionFinished)]);
        let mut session = Session::new();
        session.run(&mut source).await.unwrap();
        assert_eq!(session.state(), SessionState::Finished);
        assert!(matches!(session.into_audio(), Err(Error::EmptyResult)));
    }

    #[tokio::test]
    async fn unrecognized_frames_are_ignored() {
        let mut source = ScriptedSource::new(vec![
            control(EventType::SessionStarted),
            control(EventType::TtsSentenceStart),
            control(EventType::None),
            audio(b"bytes"),
            control(EventType::SessionFinished),
        ]);
        let mut session = Session::new();
        session.run(&mut source).await.unwrap();
        assert_eq!(session.into_audio().unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn transport_failure_fails_the_session() {
        let mut source = ScriptedSource::new(vec![audio(b"pcm")]);
        let mut session = Session::new();
        let err = session.run(&mut source).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
        assert_eq!(session.state(), SessionState::Failed);
    }
}
