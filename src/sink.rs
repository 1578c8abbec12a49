use std::path::{Path, PathBuf};

use crate::error::Error;

/// Persists the accumulated audio as a single `{voice}.{encoding}` file.
/// Byte-exact passthrough, no decoding or transcoding.
pub struct AudioSink {
    dir: PathBuf,
}

impl AudioSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn save(&self, voice: &str, encoding: &str, audio: &[u8]) -> Result<PathBuf, Error> {
        if audio.is_empty() {
            return Err(Error::EmptyResult);
        }
        let path = self.dir.join(format!("{voice}.{encoding}"));
        std::fs::write(&path, audio)?;
        tracing::info!(bytes = audio.len(), path = %path.display(), "audio saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_artifact_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let sink = AudioSink::new(dir.path());
        let audio = vec![0u8, 1, 2, 254, 255];
        let path = sink.save("S_my_voice", "wav", &audio).unwrap();
        assert_eq!(path, dir.path().join("S_my_voice.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), audio);
    }

    #[test]
    fn refuses_to_write_an_empty_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let sink = AudioSink::new(dir.path());
        assert!(matches!(
            sink.save("voice", "wav", &[]),
            Err(Error::EmptyResult)
        ));
        assert!(!dir.path().join("voice.wav").exists());
    }
}
