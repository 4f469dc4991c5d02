//! Read-aloud support.
//!
//! [`AudioManager`] picks an engine per request from the reader settings:
//! the online voice goes to [`RemoteSpeech`], every other voice name is handed
//! to [`LocalSpeech`]. Only one utterance plays at a time.

pub mod local;
pub mod remote;

use crate::config::AppConfig;
use crate::settings::{ONLINE_VOICE, ReaderSettings};
use anyhow::Result;
use local::LocalSpeech;
use remote::RemoteSpeech;
use std::time::Duration;
use tracing::{info, warn};

pub trait SpeechEngine {
    /// Start speaking `text`. Returns once playback has started.
    fn speak(&mut self, text: &str, voice: Option<&str>, rate: f32) -> Result<()>;

    /// Stop whatever is currently playing. No-op when idle.
    fn stop(&mut self);

    fn voices(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpokenBy {
    Remote,
    Local,
    /// Remote speech failed and the local default voice took over.
    LocalFallback,
}

pub struct AudioManager {
    remote: Box<dyn SpeechEngine>,
    local: Box<dyn SpeechEngine>,
}

impl AudioManager {
    pub fn new(remote: Box<dyn SpeechEngine>, local: Box<dyn SpeechEngine>) -> Self {
        Self { remote, local }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let remote = RemoteSpeech::new(
            config.speech_remote_endpoint.clone(),
            config.speech_remote_language.clone(),
            Duration::from_secs(config.translation_timeout_secs.max(1)),
        )?;
        let local = LocalSpeech::new(
            config.speech_local_command.clone(),
            config.speech_local_base_wpm,
        );
        Ok(Self::new(Box::new(remote), Box::new(local)))
    }

    pub fn speak(&mut self, text: &str, settings: &ReaderSettings) -> Result<SpokenBy> {
        let text = text.trim();
        self.stop();
        if text.is_empty() {
            return Ok(SpokenBy::Local);
        }

        let rate = settings.voice_rate;
        if settings.uses_online_voice() {
            match self.remote.speak(text, None, rate) {
                Ok(()) => return Ok(SpokenBy::Remote),
                Err(err) => {
                    warn!("Online speech failed, falling back to local voice: {err:#}");
                    self.remote.stop();
                }
            }
            self.local.speak(text, None, rate)?;
            return Ok(SpokenBy::LocalFallback);
        }

        info!(voice = %settings.voice_name, rate, "Speaking with local voice");
        self.local.speak(text, Some(&settings.voice_name), rate)?;
        Ok(SpokenBy::Local)
    }

    pub fn stop(&mut self) {
        self.remote.stop();
        self.local.stop();
    }

    /// The online voice followed by whatever the local engine offers.
    pub fn voices(&self) -> Vec<String> {
        let mut voices = vec![ONLINE_VOICE.to_string()];
        match self.local.voices() {
            Ok(local) => voices.extend(local),
            Err(err) => warn!("Could not list local voices: {err:#}"),
        }
        voices
    }
}
