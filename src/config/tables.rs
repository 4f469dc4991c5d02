use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    translation: TranslationConfig,
    #[serde(default)]
    speech: SpeechConfig,
    #[serde(default)]
    annotator: AnnotatorConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            log_level: tables.logging.log_level,
            cache_dir: tables.paths.cache_dir,
            settings_path: tables.paths.settings_path,
            translation_endpoint: tables.translation.endpoint,
            translation_source_language: tables.translation.source_language,
            translation_target_language: tables.translation.target_language,
            translation_timeout_secs: tables.translation.timeout_secs,
            dictionary_path: tables.translation.dictionary_path,
            speech_remote_endpoint: tables.speech.remote_endpoint,
            speech_remote_language: tables.speech.remote_language,
            speech_local_command: tables.speech.local_command,
            speech_local_base_wpm: tables.speech.local_base_wpm,
            annotator_inline_tags: tables.annotator.inline_tags,
            annotator_extra_skip_tags: tables.annotator.extra_skip_tags,
            annotator_unit_class: tables.annotator.unit_class,
            annotator_active_class: tables.annotator.active_class,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            paths: PathsConfig {
                cache_dir: config.cache_dir.clone(),
                settings_path: config.settings_path.clone(),
            },
            translation: TranslationConfig {
                endpoint: config.translation_endpoint.clone(),
                source_language: config.translation_source_language.clone(),
                target_language: config.translation_target_language.clone(),
                timeout_secs: config.translation_timeout_secs,
                dictionary_path: config.dictionary_path.clone(),
            },
            speech: SpeechConfig {
                remote_endpoint: config.speech_remote_endpoint.clone(),
                remote_language: config.speech_remote_language.clone(),
                local_command: config.speech_local_command.clone(),
                local_base_wpm: config.speech_local_base_wpm,
            },
            annotator: AnnotatorConfig {
                inline_tags: config.annotator_inline_tags.clone(),
                extra_skip_tags: config.annotator_extra_skip_tags.clone(),
                unit_class: config.annotator_unit_class.clone(),
                active_class: config.annotator_active_class.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PathsConfig {
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
    #[serde(default = "defaults::default_settings_path")]
    settings_path: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            cache_dir: defaults::default_cache_dir(),
            settings_path: defaults::default_settings_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TranslationConfig {
    #[serde(default = "defaults::default_translation_endpoint")]
    endpoint: String,
    #[serde(default = "defaults::default_source_language")]
    source_language: String,
    #[serde(default = "defaults::default_target_language")]
    target_language: String,
    #[serde(default = "defaults::default_translation_timeout_secs")]
    timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dictionary_path: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            endpoint: defaults::default_translation_endpoint(),
            source_language: defaults::default_source_language(),
            target_language: defaults::default_target_language(),
            timeout_secs: defaults::default_translation_timeout_secs(),
            dictionary_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct SpeechConfig {
    #[serde(default = "defaults::default_speech_endpoint")]
    remote_endpoint: String,
    #[serde(default = "defaults::default_speech_language")]
    remote_language: String,
    #[serde(default = "defaults::default_speech_command")]
    local_command: String,
    #[serde(default = "defaults::default_speech_base_wpm")]
    local_base_wpm: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            remote_endpoint: defaults::default_speech_endpoint(),
            remote_language: defaults::default_speech_language(),
            local_command: defaults::default_speech_command(),
            local_base_wpm: defaults::default_speech_base_wpm(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AnnotatorConfig {
    #[serde(default = "defaults::default_inline_tags")]
    inline_tags: Vec<String>,
    #[serde(default)]
    extra_skip_tags: Vec<String>,
    #[serde(default = "defaults::default_unit_class")]
    unit_class: String,
    #[serde(default = "defaults::default_active_class")]
    active_class: String,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig {
            inline_tags: defaults::default_inline_tags(),
            extra_skip_tags: Vec::new(),
            unit_class: defaults::default_unit_class(),
            active_class: defaults::default_active_class(),
        }
    }
}
