//! User preferences persisted as JSON.
//!
//! Unlike `conf/config.toml`, which is read once, these values change while
//! the reader runs. Every successful `set` rewrites the whole file.

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Voice name that selects the remote speech endpoint.
pub const ONLINE_VOICE: &str = "Google Online";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderSettings {
    pub font_size: u32,
    pub line_height: f32,
    pub font_family: String,
    pub voice_name: String,
    pub voice_rate: f32,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: 18,
            line_height: 1.6,
            font_family: "Microsoft YaHei".to_string(),
            voice_name: ONLINE_VOICE.to_string(),
            voice_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    FontSize,
    LineHeight,
    FontFamily,
    VoiceName,
    VoiceRate,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::FontSize,
        SettingKey::LineHeight,
        SettingKey::FontFamily,
        SettingKey::VoiceName,
        SettingKey::VoiceRate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::FontSize => "font-size",
            SettingKey::LineHeight => "line-height",
            SettingKey::FontFamily => "font-family",
            SettingKey::VoiceName => "voice-name",
            SettingKey::VoiceRate => "voice-rate",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase().replace('_', "-");
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name() == wanted || key.name().replace('-', "") == wanted)
            .ok_or_else(|| anyhow!("Unknown setting `{raw}`"))
    }
}

impl ReaderSettings {
    /// Current value of `key`, formatted for display.
    pub fn value_of(&self, key: SettingKey) -> String {
        match key {
            SettingKey::FontSize => self.font_size.to_string(),
            SettingKey::LineHeight => self.line_height.to_string(),
            SettingKey::FontFamily => self.font_family.clone(),
            SettingKey::VoiceName => self.voice_name.clone(),
            SettingKey::VoiceRate => self.voice_rate.to_string(),
        }
    }

    /// Parse, validate and apply `raw` to `key`. Leaves `self` untouched on error.
    pub fn apply(&mut self, key: SettingKey, raw: &str) -> Result<()> {
        let raw = raw.trim();
        match key {
            SettingKey::FontSize => {
                let size: u32 = raw
                    .parse()
                    .with_context(|| format!("Invalid font size `{raw}`"))?;
                if !(8..=72).contains(&size) {
                    bail!("Font size must be between 8 and 72, got {size}");
                }
                self.font_size = size;
            }
            SettingKey::LineHeight => {
                let height: f32 = raw
                    .parse()
                    .with_context(|| format!("Invalid line height `{raw}`"))?;
                if !(0.8..=4.0).contains(&height) {
                    bail!("Line height must be between 0.8 and 4.0, got {height}");
                }
                self.line_height = height;
            }
            SettingKey::FontFamily => {
                if raw.is_empty() {
                    bail!("Font family cannot be empty");
                }
                self.font_family = raw.to_string();
            }
            SettingKey::VoiceName => {
                self.voice_name = if raw.is_empty() {
                    ONLINE_VOICE.to_string()
                } else {
                    raw.to_string()
                };
            }
            SettingKey::VoiceRate => {
                let rate: f32 = raw
                    .parse()
                    .with_context(|| format!("Invalid voice rate `{raw}`"))?;
                if !(0.1..=10.0).contains(&rate) {
                    bail!("Voice rate must be between 0.1 and 10, got {rate}");
                }
                self.voice_rate = rate;
            }
        }
        Ok(())
    }

    pub fn uses_online_voice(&self) -> bool {
        self.voice_name == ONLINE_VOICE
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    current: ReaderSettings,
}

impl SettingsStore {
    /// Load settings from `path`; missing fields take defaults and an
    /// unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        let current = match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<ReaderSettings>(&data) {
                Ok(settings) => {
                    info!(path = %path.display(), "Loaded reader settings");
                    settings
                }
                Err(err) => {
                    warn!(path = %path.display(), "Invalid settings JSON: {err}");
                    ReaderSettings::default()
                }
            },
            Err(err) => {
                debug!(path = %path.display(), "No saved settings, using defaults: {err}");
                ReaderSettings::default()
            }
        };
        Self {
            path: path.to_path_buf(),
            current,
        }
    }

    pub fn get(&self) -> &ReaderSettings {
        &self.current
    }

    /// Apply one change and persist immediately. Only validation errors are
    /// returned; a failed write is logged and the new value stays in effect.
    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<()> {
        let mut next = self.current.clone();
        next.apply(key, raw)?;
        self.current = next;
        info!(key = %key, value = %self.current.value_of(key), "Updated setting");
        if let Err(err) = self.save() {
            warn!("Settings not saved: {err:#}");
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings dir {}", parent.display())
                })?;
            }
        }
        let contents =
            serde_json::to_string_pretty(&self.current).context("Serializing reader settings")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("ebup-gloss-settings-{nonce}"))
            .join(name)
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let path = temp_path("settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"fontSize": 22, "voiceName": "en-us"}"#).unwrap();

        let store = SettingsStore::load(&path);
        assert_eq!(store.get().font_size, 22);
        assert_eq!(store.get().voice_name, "en-us");
        assert_eq!(store.get().line_height, 1.6);
        assert_eq!(store.get().font_family, "Microsoft YaHei");
        assert!(!store.get().uses_online_voice());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn set_persists_and_reloads() {
        let path = temp_path("nested/settings.json");
        let mut store = SettingsStore::load(&path);
        store.set(SettingKey::VoiceRate, "1.5").unwrap();
        store.set("font_size".parse().unwrap(), "20").unwrap();

        let reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.get().voice_rate, 1.5);
        assert_eq!(reloaded.get().font_size, 20);
        let _ = fs::remove_dir_all(path.parent().unwrap().parent().unwrap());
    }

    #[test]
    fn rejected_values_leave_settings_unchanged() {
        let path = temp_path("settings.json");
        let mut store = SettingsStore::load(&path);
        assert!(store.set(SettingKey::FontSize, "200").is_err());
        assert!(store.set(SettingKey::VoiceRate, "fast").is_err());
        assert_eq!(store.get(), &ReaderSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_keeps_the_new_value() {
        let blocker = temp_path("not-a-dir");
        fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        fs::write(&blocker, "file").unwrap();

        let mut store = SettingsStore::load(&blocker.join("settings.json"));
        store.set(SettingKey::FontSize, "24").unwrap();
        assert_eq!(store.get().font_size, 24);
        assert!(store.save().is_err());
        let _ = fs::remove_dir_all(blocker.parent().unwrap());
    }

    #[test]
    fn parses_key_spellings() {
        assert_eq!("voice-rate".parse::<SettingKey>().unwrap(), SettingKey::VoiceRate);
        assert_eq!("lineHeight".parse::<SettingKey>().unwrap(), SettingKey::LineHeight);
        assert!("volume".parse::<SettingKey>().is_err());
    }

    #[test]
    fn corrupt_file_uses_defaults() {
        let path = temp_path("settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert_eq!(SettingsStore::load(&path).get(), &ReaderSettings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
