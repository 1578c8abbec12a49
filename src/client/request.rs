use serde::Serialize;
use uuid::Uuid;

use crate::client::consts::{DEFAULT_ENCODING, DEFAULT_SAMPLE_RATE};
use crate::error::Error;

/// What to synthesize and how the audio should come back.
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    voice: String,
    text: String,
    encoding: String,
    sample_rate: u32,
}

impl SynthesisParams {
    pub fn new(voice: &str, text: &str) -> Self {
        Self {
            voice: voice.to_string(),
            text: text.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// The request body sent as the one full-client frame of a session.
#[derive(Debug, Serialize)]
pub struct SynthesisRequest {
    user: User,
    req_params: ReqParams,
}

#[derive(Debug, Serialize)]
struct User {
    uid: String,
}

#[derive(Debug, Serialize)]
struct ReqParams {
    speaker: String,
    audio_params: AudioParams,
    // The wire schema wants this as a string holding serialized JSON, not
    // a nested object.
    additions: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct AudioParams {
    format: String,
    sample_rate: u32,
    enable_timestamp: bool,
}

#[derive(Debug, Serialize, Default)]
struct Additions {
    disable_markdown_filter: bool,
}

impl Additions {
    /// The explicit embed-as-string encoding step required by the service.
    fn to_field(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

impl SynthesisRequest {
    /// Assembles the request body. The user id is freshly generated on
    /// every call and never reused across sessions.
    pub fn build(params: &SynthesisParams) -> Result<Self, Error> {
        Ok(Self {
            user: User {
                uid: Uuid::new_v4().to_string(),
            },
            req_params: ReqParams {
                speaker: params.voice().to_string(),
                audio_params: AudioParams {
                    format: params.encoding().to_string(),
                    sample_rate: params.sample_rate(),
                    enable_timestamp: true,
                },
                additions: Additions::default().to_field()?,
                text: params.text().to_string(),
            },
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(params: &SynthesisParams) -> serde_json::Value {
        let bytes = SynthesisRequest::build(params).unwrap().to_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn request_body_matches_the_wire_schema() {
        let params = SynthesisParams::new("zh_female_cancan_mars_bigtts", "你好");
        let body = body(&params);
        assert_eq!(body["req_params"]["speaker"], "zh_female_cancan_mars_bigtts");
        assert_eq!(body["req_params"]["text"], "你好");
        assert_eq!(body["req_params"]["audio_params"]["format"], "wav");
        assert_eq!(body["req_params"]["audio_params"]["sample_rate"], 24000);
        assert_eq!(body["req_params"]["audio_params"]["enable_timestamp"], true);
        assert!(body["user"]["uid"].as_str().is_some_and(|uid| !uid.is_empty()));
    }

    #[test]
    fn additions_is_a_string_of_serialized_json() {
        let params = SynthesisParams::new("voice", "text");
        let body = body(&params);
        let additions = body["req_params"]["additions"]
            .as_str()
            .expect("additions must be a string, not a nested object");
        let inner: serde_json::Value = serde_json::from_str(additions).unwrap();
        assert_eq!(inner, serde_json::json!({"disable_markdown_filter": false}));
    }

    #[test]
    fn encoding_and_sample_rate_overrides_apply() {
        let params = SynthesisParams::new("voice", "text")
            .with_encoding("mp3")
            .with_sample_rate(16000);
        let body = body(&params);
        assert_eq!(body["req_params"]["audio_params"]["format"], "mp3");
        assert_eq!(body["req_params"]["audio_params"]["sample_rate"], 16000);
    }

    #[test]
    fn user_ids_are_fresh_per_request() {
        let params = SynthesisParams::new("voice", "text");
        let a = body(&params);
        let b = body(&params);
        assert_ne!(a["user"]["uid"], b["user"]["uid"]);
    }
}
