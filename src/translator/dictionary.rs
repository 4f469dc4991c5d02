//! Small offline word list consulted before any network lookup.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("welcome", "adj. 受欢迎的；n. 欢迎；v. 欢迎"),
    ("windows", "n. 窗户；Windows操作系统"),
    ("development", "n. 发展；开发；生长"),
    ("click", "v. 点击；发出咔哒声"),
    ("word", "n. 单词；话语；消息"),
    ("translation", "n. 翻译；译文"),
    ("simple", "adj. 简单的；单纯的"),
    ("demonstration", "n. 示范；证明；示威"),
    ("desktop", "n. 桌面；台式机"),
    ("application", "n. 应用；申请；应用程序"),
    ("powerful", "adj. 强大的；强有力的"),
    ("epub", "n. 电子书格式"),
    ("library", "n. 图书馆；库"),
    ("files", "n. 文件 (复数)"),
];

/// Lookup form of a word: NFC-normalised and lower-cased.
pub fn lookup_key(word: &str) -> String {
    word.trim().nfc().collect::<String>().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dictionary {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|(word, meaning)| (lookup_key(word), meaning.to_string()))
                .collect(),
        }
    }

    /// Builtin entries extended (and overridden) by a JSON object of
    /// `word -> definition` pairs.
    pub fn with_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary at {}", path.display()))?;
        let extra: BTreeMap<String, String> = serde_json::from_str(&data)
            .with_context(|| format!("Invalid dictionary JSON at {}", path.display()))?;

        let mut dictionary = Self::builtin();
        let added = extra.len();
        for (word, meaning) in extra {
            dictionary.insert(&word, meaning);
        }
        info!(path = %path.display(), added, total = dictionary.len(), "Loaded dictionary file");
        Ok(dictionary)
    }

    pub fn insert(&mut self, word: &str, meaning: impl Into<String>) {
        let key = lookup_key(word);
        if !key.is_empty() {
            self.entries.insert(key, meaning.into());
        }
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(&lookup_key(word)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn lookup_ignores_case() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.lookup("Library"), Some("n. 图书馆；库"));
        assert_eq!(dict.lookup("unknown"), None);
    }

    #[test]
    fn decomposed_input_matches_composed_entry() {
        let mut dict = Dictionary::builtin();
        dict.insert("café", "n. 咖啡馆");
        assert_eq!(dict.lookup("cafe\u{0301}"), Some("n. 咖啡馆"));
        assert_eq!(dict.lookup("CAFÉ"), Some("n. 咖啡馆"));
    }

    #[test]
    fn file_entries_extend_builtin() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ebup-gloss-dict-{nonce}.json"));
        fs::write(&path, r#"{"Reader": "n. 读者", "click": "v. 单击"}"#).unwrap();

        let dict = Dictionary::with_file(&path).unwrap();
        assert_eq!(dict.lookup("reader"), Some("n. 读者"));
        assert_eq!(dict.lookup("click"), Some("v. 单击"));
        assert_eq!(dict.len(), BUILTIN_ENTRIES.len() + 1);
        let _ = fs::remove_file(path);
    }
}
