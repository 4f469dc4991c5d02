//! Online text-to-speech: fetch an MP3 for the text and play it.

use super::SpeechEngine;
use anyhow::{Context, Result, bail};
use reqwest::Url;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info};

/// Keeps the output stream alive for as long as the sink plays.
struct Playback {
    _stream: OutputStream,
    sink: Sink,
}

pub struct RemoteSpeech {
    client: Client,
    endpoint: String,
    language: String,
    playback: Option<Playback>,
}

impl RemoteSpeech {
    pub fn new(
        endpoint: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Building speech HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            language: language.into(),
            playback: None,
        })
    }

    pub fn request_url(&self, text: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
            ],
        )
        .with_context(|| format!("Invalid speech endpoint `{}`", self.endpoint))
    }

    fn fetch(&self, text: &str) -> Result<Vec<u8>> {
        let url = self.request_url(text)?;
        let response = self
            .client
            .get(url)
            .send()
            .context("Sending speech request")?;
        let status = response.status();
        if !status.is_success() {
            bail!("Speech endpoint returned {status}");
        }
        let bytes = response.bytes().context("Reading speech audio")?;
        if bytes.is_empty() {
            bail!("Speech endpoint returned no audio");
        }
        Ok(bytes.to_vec())
    }
}

impl SpeechEngine for RemoteSpeech {
    fn speak(&mut self, text: &str, _voice: Option<&str>, rate: f32) -> Result<()> {
        let audio = self.fetch(text)?;
        debug!(bytes = audio.len(), "Fetched online speech audio");

        let (stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = Sink::try_new(&handle).context("Creating sink")?;
        let source = Decoder::new(Cursor::new(audio)).context("Decoding speech audio")?;
        sink.set_speed(rate.clamp(0.5, 4.0));
        sink.append(source);
        sink.play();
        info!(chars = text.len(), "Playing online speech");

        self.playback = Some(Playback {
            _stream: stream,
            sink,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tts_query() {
        let speech = RemoteSpeech::new(
            "https://tts.example/translate_tts",
            "en",
            Duration::from_secs(1),
        )
        .unwrap();
        let url = speech.request_url("café au lait").unwrap();
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            query,
            vec![
                ("ie".to_string(), "UTF-8".to_string()),
                ("q".to_string(), "café au lait".to_string()),
                ("tl".to_string(), "en".to_string()),
                ("client".to_string(), "tw-ob".to_string()),
            ]
        );
    }
}
