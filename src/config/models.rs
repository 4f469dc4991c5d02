use serde::Deserialize;

/// Flattened reader configuration; built from the sectioned TOML tables.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_settings_path")]
    pub settings_path: String,
    #[serde(default = "crate::config::defaults::default_translation_endpoint")]
    pub translation_endpoint: String,
    #[serde(default = "crate::config::defaults::default_source_language")]
    pub translation_source_language: String,
    #[serde(default = "crate::config::defaults::default_target_language")]
    pub translation_target_language: String,
    #[serde(default = "crate::config::defaults::default_translation_timeout_secs")]
    pub translation_timeout_secs: u64,
    #[serde(default)]
    pub dictionary_path: Option<String>,
    #[serde(default = "crate::config::defaults::default_speech_endpoint")]
    pub speech_remote_endpoint: String,
    #[serde(default = "crate::config::defaults::default_speech_language")]
    pub speech_remote_language: String,
    #[serde(default = "crate::config::defaults::default_speech_command")]
    pub speech_local_command: String,
    #[serde(default = "crate::config::defaults::default_speech_base_wpm")]
    pub speech_local_base_wpm: u32,
    #[serde(default = "crate::config::defaults::default_inline_tags")]
    pub annotator_inline_tags: Vec<String>,
    #[serde(default)]
    pub annotator_extra_skip_tags: Vec<String>,
    #[serde(default = "crate::config::defaults::default_unit_class")]
    pub annotator_unit_class: String,
    #[serde(default = "crate::config::defaults::default_active_class")]
    pub annotator_active_class: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            settings_path: crate::config::defaults::default_settings_path(),
            translation_endpoint: crate::config::defaults::default_translation_endpoint(),
            translation_source_language: crate::config::defaults::default_source_language(),
            translation_target_language: crate::config::defaults::default_target_language(),
            translation_timeout_secs:
                crate::config::defaults::default_translation_timeout_secs(),
            dictionary_path: None,
            speech_remote_endpoint: crate::config::defaults::default_speech_endpoint(),
            speech_remote_language: crate::config::defaults::default_speech_language(),
            speech_local_command: crate::config::defaults::default_speech_command(),
            speech_local_base_wpm: crate::config::defaults::default_speech_base_wpm(),
            annotator_inline_tags: crate::config::defaults::default_inline_tags(),
            annotator_extra_skip_tags: Vec::new(),
            annotator_unit_class: crate::config::defaults::default_unit_class(),
            annotator_active_class: crate::config::defaults::default_active_class(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
