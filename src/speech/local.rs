//! Local speech through an external synthesiser process (`espeak-ng` by
//! default).

use super::SpeechEngine;
use anyhow::{Context, Result, bail};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

pub struct LocalSpeech {
    command: String,
    base_wpm: u32,
    child: Option<Child>,
}

impl LocalSpeech {
    pub fn new(command: impl Into<String>, base_wpm: u32) -> Self {
        Self {
            command: command.into(),
            base_wpm: base_wpm.max(1),
            child: None,
        }
    }

    /// Arguments for speaking `text`; the text always comes last, after `--`.
    pub fn command_args(&self, text: &str, voice: Option<&str>, rate: f32) -> Vec<String> {
        let wpm = (self.base_wpm as f32 * rate.clamp(0.1, 10.0))
            .round()
            .clamp(80.0, 450.0) as u32;
        let mut args = vec!["-s".to_string(), wpm.to_string()];
        if let Some(voice) = voice.map(str::trim).filter(|voice| !voice.is_empty()) {
            args.push("-v".to_string());
            args.push(voice.to_string());
        }
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

impl SpeechEngine for LocalSpeech {
    fn speak(&mut self, text: &str, voice: Option<&str>, rate: f32) -> Result<()> {
        let args = self.command_args(text, voice, rate);
        debug!(command = %self.command, ?voice, rate, "Starting local speech");
        let child = Command::new(&self.command)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start `{}`", self.command))?;
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                if let Err(err) = child.kill() {
                    warn!("Failed to stop local speech: {err}");
                }
            }
            let _ = child.wait();
        }
    }

    fn voices(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.command)
            .arg("--voices")
            .output()
            .with_context(|| format!("Failed to run `{} --voices`", self.command))?;
        if !output.status.success() {
            bail!("`{} --voices` exited with {}", self.command, output.status);
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        let voices = parse_voice_list(&listing);
        info!(count = voices.len(), "Listed local voices");
        Ok(voices)
    }
}

impl Drop for LocalSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Voice names from an `espeak-ng --voices` table, English voices only
/// unless there are none.
pub fn parse_voice_list(listing: &str) -> Vec<String> {
    let rows: Vec<(String, String)> = listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_, language, _, name, ..] => Some((language.to_string(), name.to_string())),
                _ => None,
            }
        })
        .collect();

    let english: Vec<String> = rows
        .iter()
        .filter(|(language, _)| language.starts_with("en"))
        .map(|(_, name)| name.clone())
        .collect();

    if english.is_empty() {
        rows.into_iter().map(|(_, name)| name).collect()
    } else {
        english
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_rate_and_places_text_last() {
        let speech = LocalSpeech::new("espeak-ng", 175);
        assert_eq!(
            speech.command_args("-dash first", Some(" en-us "), 1.2),
            vec!["-s", "210", "-v", "en-us", "--", "-dash first"]
        );
        assert_eq!(
            speech.command_args("x", None, 0.1),
            vec!["-s", "80", "--", "x"]
        );
    }

    #[test]
    fn prefers_english_voices() {
        let listing = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en            (en 2)
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";
        assert_eq!(
            parse_voice_list(listing),
            vec!["English_(Great_Britain)", "English_(America)"]
        );
        assert_eq!(
            parse_voice_list("header\n 5 af --/M Afrikaans gmw/af\n"),
            vec!["Afrikaans"]
        );
    }

    #[test]
    fn missing_command_is_an_error() {
        let mut speech = LocalSpeech::new("/nonexistent/ebup-gloss-tts", 175);
        assert!(speech.speak("hello", None, 1.0).is_err());
        speech.stop();
    }
}
