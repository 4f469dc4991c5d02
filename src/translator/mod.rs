//! Word and sentence translation.
//!
//! Words are looked up in the offline [`Dictionary`] first (by their lookup
//! form) and only go to the remote translator on a miss. Sentences always
//! go remote.

pub mod dictionary;
pub mod google;

use crate::config::AppConfig;
use anyhow::{Context, Result};
use dictionary::Dictionary;
use google::GoogleTranslate;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub trait Translate {
    fn translate(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordMeaning {
    Local(String),
    Remote(String),
}

impl WordMeaning {
    pub fn text(&self) -> &str {
        match self {
            WordMeaning::Local(text) | WordMeaning::Remote(text) => text,
        }
    }
}

pub struct Translator {
    dictionary: Dictionary,
    remote: Box<dyn Translate>,
}

impl Translator {
    pub fn new(dictionary: Dictionary, remote: Box<dyn Translate>) -> Self {
        Self { dictionary, remote }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let dictionary = match config.dictionary_path.as_deref() {
            Some(path) => match Dictionary::with_file(Path::new(path)) {
                Ok(dictionary) => dictionary,
                Err(err) => {
                    warn!("Using builtin dictionary only: {err:#}");
                    Dictionary::builtin()
                }
            },
            None => Dictionary::builtin(),
        };
        let remote = GoogleTranslate::new(
            config.translation_endpoint.clone(),
            config.translation_source_language.clone(),
            config.translation_target_language.clone(),
            Duration::from_secs(config.translation_timeout_secs.max(1)),
        )?;
        Ok(Self::new(dictionary, Box::new(remote)))
    }

    pub fn lookup_word(&self, word: &str) -> Result<WordMeaning> {
        if let Some(meaning) = self.dictionary.lookup(word) {
            debug!(word, "Dictionary hit");
            return Ok(WordMeaning::Local(meaning.to_string()));
        }
        let key = dictionary::lookup_key(word);
        let translated = self
            .remote
            .translate(&key)
            .with_context(|| format!("Translation failed for `{word}`"))?;
        Ok(WordMeaning::Remote(translated))
    }

    pub fn translate_sentence(&self, sentence: &str) -> Result<String> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Ok(String::new());
        }
        self.remote
            .translate(sentence)
            .context("Sentence translation failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRemote {
        requests: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Translate for RecordingRemote {
        fn translate(&self, text: &str) -> Result<String> {
            self.requests.borrow_mut().push(text.to_string());
            if self.fail {
                bail!("offline");
            }
            Ok(format!("<{text}>"))
        }
    }

    impl Translate for std::rc::Rc<RecordingRemote> {
        fn translate(&self, text: &str) -> Result<String> {
            self.as_ref().translate(text)
        }
    }

    #[test]
    fn dictionary_hits_skip_the_network() {
        let remote = std::rc::Rc::new(RecordingRemote::default());
        let translator = Translator::new(Dictionary::builtin(), Box::new(remote.clone()));

        let hit = translator.lookup_word("Click").unwrap();
        assert!(matches!(hit, WordMeaning::Local(_)));
        assert!(remote.requests.borrow().is_empty());

        let miss = translator.lookup_word("Zebra").unwrap();
        assert_eq!(miss, WordMeaning::Remote("<zebra>".to_string()));
        assert_eq!(remote.requests.borrow().as_slice(), &["zebra".to_string()]);
    }

    #[test]
    fn remote_failures_surface_as_errors() {
        let remote = RecordingRemote {
            fail: true,
            ..RecordingRemote::default()
        };
        let translator = Translator::new(Dictionary::builtin(), Box::new(remote));
        let err = translator.lookup_word("zebra").unwrap_err();
        assert!(format!("{err:#}").contains("zebra"));
        assert!(translator.translate_sentence(" Some sentence. ").is_err());
        assert_eq!(translator.translate_sentence("   ").unwrap(), "");
    }
}
