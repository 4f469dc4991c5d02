//! The reading session that ties rendering, annotation and the word card
//! together.
//!
//! Word clicks leave the annotator through its handler as [`WordClick`]
//! messages on a channel; the session drains them after each dispatch and
//! turns them into [`WordCard`]s (translation plus pronunciation).

use crate::annotator::walker::word_units;
use crate::annotator::{Annotator, AnnotatorContext};
use crate::cache::{BookCache, ReadingPosition};
use crate::config::AppConfig;
use crate::content::{ContentTree, NodeId};
use crate::epub_loader::load_book;
use crate::events::dispatch_click;
use crate::render::{ContentHook, Rendition, SectionSource};
use crate::settings::{ReaderSettings, SettingKey, SettingsStore};
use crate::speech::{AudioManager, SpokenBy};
use crate::theme::ThemeHook;
use crate::translator::{Translator, WordMeaning};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info, warn};

pub const TRANSLATION_FAILED: &str = "translation failed";
const VOICE_CHANGED_PHRASE: &str = "Voice changed";
pub const VOICE_TEST_PHRASE: &str = "This is a test of the audio quality.";

/// One activation reported by the annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordClick {
    pub word: String,
    pub sentence: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCard {
    pub word: String,
    pub meaning: String,
    /// The meaning came from the offline dictionary.
    pub local: bool,
    pub sentence: String,
    pub sentence_translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Word(WordCard),
    PageTurned(usize),
    /// Nothing happened: a non-word click on the last section.
    Ignored,
}

/// Collaborators a session needs besides the book itself.
pub struct Services {
    pub translator: Translator,
    pub audio: AudioManager,
    pub settings: SettingsStore,
    pub cache: BookCache,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            translator: Translator::from_config(config)?,
            audio: AudioManager::from_config(config)?,
            settings: SettingsStore::load(Path::new(&config.settings_path)),
            cache: BookCache::new(&config.cache_dir),
        })
    }
}

pub struct ReaderSession {
    book: Option<PathBuf>,
    rendition: Rendition,
    annotator: Annotator,
    services: Services,
    clicks: Receiver<WordClick>,
    resume_unit: Option<usize>,
}

impl ReaderSession {
    pub fn new(
        source: Box<dyn SectionSource>,
        book: Option<PathBuf>,
        ctx: AnnotatorContext,
        services: Services,
    ) -> Self {
        let (tx, clicks) = mpsc::channel();
        let mut annotator = Annotator::new(ctx);
        annotator.on_word_click(move |word, sentence| {
            let click = WordClick {
                word: word.to_string(),
                sentence: sentence.to_string(),
            };
            if tx.send(click).is_err() {
                debug!("Word click dropped: session closed");
            }
        });

        Self {
            book,
            rendition: Rendition::new(source),
            annotator,
            services,
            clicks,
            resume_unit: None,
        }
    }

    /// Open a book from disk and show the remembered section (or the first).
    pub fn open(path: &Path, config: &AppConfig) -> Result<Self> {
        let source = load_book(path)?;
        let services = Services::from_config(config)?;
        let mut session = Self::new(
            source,
            Some(path.to_path_buf()),
            AnnotatorContext::from_config(config),
            services,
        );
        session.services.cache.save_last_book(path);
        session.resume()?;
        Ok(session)
    }

    fn resume(&mut self) -> Result<()> {
        let position = self
            .book
            .as_deref()
            .and_then(|book| self.services.cache.load_position(book))
            .filter(|pos| pos.section < self.rendition.section_count());
        let section = position.map_or(0, |pos| pos.section);
        if self.rendition.section_count() == 0 {
            bail!("Book has no readable sections");
        }
        self.display(section)?;
        self.resume_unit = position.and_then(|pos| pos.unit);
        self.save_position(self.resume_unit);
        if let Some(pos) = position {
            info!(section = pos.section + 1, unit = ?pos.unit, "Resumed reading position");
        }
        Ok(())
    }

    pub fn title(&self) -> &str {
        self.rendition.title()
    }

    pub fn section_count(&self) -> usize {
        self.rendition.section_count()
    }

    pub fn current_section(&self) -> Option<usize> {
        self.rendition.current_index()
    }

    /// Ordinal of the unit that was active when the book was last closed.
    pub fn resume_unit(&self) -> Option<usize> {
        self.resume_unit
    }

    pub fn settings(&self) -> &ReaderSettings {
        self.services.settings.get()
    }

    pub fn rendition(&self) -> &Rendition {
        &self.rendition
    }

    /// Render section `index` with the theme and annotator hooks.
    pub fn display(&mut self, index: usize) -> Result<()> {
        let mut theme = ThemeHook::new(self.services.settings.get(), self.annotator.context());
        self.rendition.display(
            index,
            &mut [
                &mut theme as &mut dyn ContentHook,
                &mut self.annotator as &mut dyn ContentHook,
            ],
        )?;
        self.resume_unit = None;
        self.save_position(None);
        Ok(())
    }

    pub fn next(&mut self) -> Result<Option<usize>> {
        match self.rendition.next_index() {
            Some(index) => self.display(index).map(|_| Some(index)),
            None => Ok(None),
        }
    }

    pub fn prev(&mut self) -> Result<Option<usize>> {
        match self.rendition.prev_index() {
            Some(index) => self.display(index).map(|_| Some(index)),
            None => Ok(None),
        }
    }

    /// Visible text of the current section.
    pub fn text(&self) -> String {
        let tree = self.rendition.tree();
        let classifier = self.annotator.context().classifier.as_ref();
        let display = |tree: &ContentTree, id: NodeId| classifier.display(tree, id);
        tree.rendered_text(tree.root(), &display)
    }

    /// Word units of the current section in reading order.
    pub fn words(&self) -> Vec<String> {
        let tree = self.rendition.tree();
        word_units(tree, tree.root())
            .into_iter()
            .map(|unit| tree.text_content(unit))
            .collect()
    }

    /// Click the `ordinal`-th word unit of the current section.
    pub fn click_unit(&mut self, ordinal: usize) -> Result<ClickOutcome> {
        let tree = self.rendition.tree();
        let units = word_units(tree, tree.root());
        let Some(&unit) = units.get(ordinal) else {
            bail!(
                "No word #{ordinal} in this section ({} words)",
                units.len()
            );
        };
        let outcome = self.click(unit)?;
        if matches!(outcome, ClickOutcome::Word(_)) {
            self.save_position(Some(ordinal));
        }
        Ok(outcome)
    }

    /// Click on the page outside any word.
    pub fn tap(&mut self) -> Result<ClickOutcome> {
        let root = self.rendition.tree().root();
        self.click(root)
    }

    pub fn click(&mut self, target: NodeId) -> Result<ClickOutcome> {
        let event = dispatch_click(self.rendition.tree_mut(), &mut self.annotator, target);
        if event.propagation_stopped() {
            return Ok(self
                .next_card()
                .map_or(ClickOutcome::Ignored, ClickOutcome::Word));
        }
        Ok(match self.next()? {
            Some(index) => ClickOutcome::PageTurned(index),
            None => ClickOutcome::Ignored,
        })
    }

    /// Turn the most recent pending word click into a card.
    pub fn next_card(&mut self) -> Option<WordCard> {
        let click = self.clicks.try_iter().last()?;
        self.speak(&click.word);
        Some(self.build_card(click))
    }

    fn build_card(&self, click: WordClick) -> WordCard {
        let translator = &self.services.translator;
        let (meaning, local) = match translator.lookup_word(&click.word) {
            Ok(meaning) => (
                meaning.text().to_string(),
                matches!(meaning, WordMeaning::Local(_)),
            ),
            Err(err) => {
                warn!("{err:#}");
                (TRANSLATION_FAILED.to_string(), false)
            }
        };
        let sentence = click.sentence.trim().to_string();
        let sentence_translation = match translator.translate_sentence(&sentence) {
            Ok(text) => text,
            Err(err) => {
                warn!("{err:#}");
                TRANSLATION_FAILED.to_string()
            }
        };
        WordCard {
            word: click.word,
            meaning,
            local,
            sentence,
            sentence_translation,
        }
    }

    /// Speak `text` with the current voice. Failures are logged only.
    pub fn speak(&mut self, text: &str) -> Option<SpokenBy> {
        match self.services.audio.speak(text, self.services.settings.get()) {
            Ok(spoken) => Some(spoken),
            Err(err) => {
                warn!("Speech failed: {err:#}");
                None
            }
        }
    }

    pub fn stop_speech(&mut self) {
        self.services.audio.stop();
    }

    pub fn voices(&self) -> Vec<String> {
        self.services.audio.voices()
    }

    /// Change one setting. Style changes re-render the current section;
    /// voice changes are announced with the new voice.
    pub fn set_setting(&mut self, key: SettingKey, raw: &str) -> Result<()> {
        self.services
            .settings
            .set(key, raw)
            .with_context(|| format!("Could not set {key}"))?;
        match key {
            SettingKey::FontSize | SettingKey::LineHeight | SettingKey::FontFamily => {
                if let Some(index) = self.rendition.current_index() {
                    self.display(index)?;
                }
            }
            SettingKey::VoiceName => {
                self.speak(VOICE_CHANGED_PHRASE);
            }
            SettingKey::VoiceRate => {}
        }
        Ok(())
    }

    fn save_position(&self, unit: Option<usize>) {
        let (Some(book), Some(section)) = (self.book.as_deref(), self.rendition.current_index())
        else {
            return;
        };
        self.services
            .cache
            .save_position(book, ReadingPosition { section, unit });
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        self.services.audio.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StaticSections;
    use crate::speech::SpeechEngine;
    use crate::translator::Translate;
    use crate::translator::dictionary::Dictionary;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct EchoRemote {
        fail: bool,
    }

    impl Translate for EchoRemote {
        fn translate(&self, text: &str) -> Result<String> {
            if self.fail {
                return Err(anyhow!("network down"));
            }
            Ok(format!("[{text}]"))
        }
    }

    struct QuietEngine {
        spoken: Rc<RefCell<Vec<String>>>,
    }

    impl SpeechEngine for QuietEngine {
        fn speak(&mut self, text: &str, _voice: Option<&str>, _rate: f32) -> Result<()> {
            self.spoken.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn stop(&mut self) {}
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("ebup-gloss-{tag}-{nonce}"))
    }

    fn session(
        sections: &[&str],
        fail_remote: bool,
        dir: &Path,
    ) -> (ReaderSession, Rc<RefCell<Vec<String>>>) {
        let spoken = Rc::new(RefCell::new(Vec::new()));
        let services = Services {
            translator: Translator::new(
                Dictionary::builtin(),
                Box::new(EchoRemote { fail: fail_remote }),
            ),
            audio: AudioManager::new(
                Box::new(QuietEngine {
                    spoken: spoken.clone(),
                }),
                Box::new(QuietEngine {
                    spoken: spoken.clone(),
                }),
            ),
            settings: SettingsStore::load(&dir.join("settings.json")),
            cache: BookCache::new(dir.join("cache")),
        };
        let source = StaticSections {
            title: "Test".to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
        };
        let mut session = ReaderSession::new(
            Box::new(source),
            Some(dir.join("book.html")),
            AnnotatorContext::default(),
            services,
        );
        session.display(0).unwrap();
        (session, spoken)
    }

    #[test]
    fn word_click_builds_card_and_speaks() {
        let dir = temp_dir("session");
        let (mut session, spoken) = session(
            &["<p>The quick-fox jumps, Ünïcode café!</p><p>Click here.</p>"],
            false,
            &dir,
        );
        assert_eq!(
            session.words(),
            vec!["The", "quick", "fox", "jumps", "Ünïcode", "café", "Click", "here"]
        );

        let outcome = session.click_unit(5).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Word(WordCard {
                word: "café".to_string(),
                meaning: "[café]".to_string(),
                local: false,
                sentence: "Ünïcode café!".to_string(),
                sentence_translation: "[Ünïcode café!]".to_string(),
            })
        );
        assert_eq!(spoken.borrow().as_slice(), &["café".to_string()]);

        let ClickOutcome::Word(card) = session.click_unit(6).unwrap() else {
            panic!("expected a word card");
        };
        assert!(card.local);
        assert_eq!(card.sentence, "Click here.");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn failed_translation_still_yields_a_card() {
        let dir = temp_dir("offline");
        let (mut session, _) = session(&["<p>Zebras run.</p>"], true, &dir);
        let ClickOutcome::Word(card) = session.click_unit(0).unwrap() else {
            panic!("expected a word card");
        };
        assert_eq!(card.meaning, TRANSLATION_FAILED);
        assert_eq!(card.sentence_translation, TRANSLATION_FAILED);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn tap_turns_page_until_the_end() {
        let dir = temp_dir("tap");
        let (mut session, _) = session(&["<p>One.</p>", "<p>Two.</p>"], false, &dir);
        assert_eq!(session.tap().unwrap(), ClickOutcome::PageTurned(1));
        assert_eq!(session.words(), vec!["Two"]);
        assert_eq!(session.tap().unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.prev().unwrap(), Some(0));
        assert!(session.click_unit(7).is_err());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn position_is_saved_on_display_and_click() {
        let dir = temp_dir("position");
        let (mut session, _) = session(&["<p>One.</p>", "<p>Two words.</p>"], false, &dir);
        session.next().unwrap();
        session.click_unit(1).unwrap();

        let cache = BookCache::new(dir.join("cache"));
        assert_eq!(
            cache.load_position(&dir.join("book.html")),
            Some(ReadingPosition {
                section: 1,
                unit: Some(1),
            })
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn style_change_rerenders_with_new_theme() {
        let dir = temp_dir("style");
        let (mut session, spoken) = session(&["<p>Styled text.</p>"], false, &dir);
        session.set_setting(SettingKey::FontSize, "24").unwrap();
        assert_eq!(session.settings().font_size, 24);
        let html = session.rendition().tree().to_html(session.rendition().tree().root());
        assert!(html.contains("font-size: 24px"));
        assert_eq!(session.words(), vec!["Styled", "text"]);

        session.set_setting(SettingKey::VoiceName, "en-us").unwrap();
        assert_eq!(spoken.borrow().last().map(String::as_str), Some("Voice changed"));
        assert!(session.set_setting(SettingKey::FontSize, "500").is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
