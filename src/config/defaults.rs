use crate::annotator::display::DEFAULT_INLINE_TAGS;
use crate::annotator::{DEFAULT_ACTIVE_CLASS, DEFAULT_UNIT_CLASS};

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_settings_path() -> String {
    "conf/settings.json".to_string()
}

pub(crate) fn default_translation_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

pub(crate) fn default_source_language() -> String {
    "auto".to_string()
}

pub(crate) fn default_target_language() -> String {
    "zh-CN".to_string()
}

pub(crate) fn default_translation_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_speech_endpoint() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

pub(crate) fn default_speech_language() -> String {
    "en".to_string()
}

pub(crate) fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

pub(crate) fn default_speech_base_wpm() -> u32 {
    175
}

pub(crate) fn default_inline_tags() -> Vec<String> {
    DEFAULT_INLINE_TAGS.iter().map(|tag| tag.to_string()).collect()
}

pub(crate) fn default_unit_class() -> String {
    DEFAULT_UNIT_CLASS.to_string()
}

pub(crate) fn default_active_class() -> String {
    DEFAULT_ACTIVE_CLASS.to_string()
}
