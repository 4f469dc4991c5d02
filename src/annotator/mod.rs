//! Clickable-word annotation of rendered sections.
//!
//! The annotator runs once per render pass: it wraps every word of the
//! fresh tree in a unit, forgets the previous highlight, and afterwards
//! turns clicks on units into `(word, sentence)` notifications for the host.

pub mod display;
pub mod selection;
pub mod sentence;
pub mod tokenizer;
pub mod walker;

use crate::config::AppConfig;
use crate::content::{ContentTree, NodeId};
use crate::events::ClickEvent;
use crate::render::ContentHook;
use display::{DisplayClassifier, TagDisplay};
use selection::Selection;
use std::collections::HashSet;
use tracing::{debug, trace};

pub const DEFAULT_UNIT_CLASS: &str = "click-word";
pub const DEFAULT_ACTIVE_CLASS: &str = "active";
pub const DEFAULT_SKIP_TAGS: &[&str] = &["script", "style"];

/// Everything the annotator needs from its host, passed in explicitly.
pub struct AnnotatorContext {
    pub classifier: Box<dyn DisplayClassifier>,
    pub skip_tags: HashSet<String>,
    pub unit_class: String,
    pub active_class: String,
}

impl Default for AnnotatorContext {
    fn default() -> Self {
        Self {
            classifier: Box::new(TagDisplay::default()),
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|tag| tag.to_string()).collect(),
            unit_class: DEFAULT_UNIT_CLASS.to_string(),
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
        }
    }
}

impl AnnotatorContext {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut skip_tags: HashSet<String> =
            DEFAULT_SKIP_TAGS.iter().map(|tag| tag.to_string()).collect();
        skip_tags.extend(
            config
                .annotator_extra_skip_tags
                .iter()
                .map(|tag| tag.trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty()),
        );
        Self {
            classifier: Box::new(TagDisplay::new(config.annotator_inline_tags.clone())),
            skip_tags,
            unit_class: config.annotator_unit_class.clone(),
            active_class: config.annotator_active_class.clone(),
        }
    }

    pub fn skips(&self, tag: &str) -> bool {
        self.skip_tags.contains(tag)
    }
}

pub type WordClickHandler = Box<dyn FnMut(&str, &str)>;

pub struct Annotator {
    ctx: AnnotatorContext,
    selection: Selection,
    handler: Option<WordClickHandler>,
    passes: u64,
}

impl Annotator {
    pub fn new(ctx: AnnotatorContext) -> Self {
        Self {
            ctx,
            selection: Selection::Idle,
            handler: None,
            passes: 0,
        }
    }

    pub fn context(&self) -> &AnnotatorContext {
        &self.ctx
    }

    /// Register the word-click handler, replacing any previous one.
    pub fn on_word_click(&mut self, handler: impl FnMut(&str, &str) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Start a render pass over `tree`: clear any highlight left in it,
    /// reset the selection and wrap words.
    pub fn annotate(&mut self, tree: &mut ContentTree) -> usize {
        for unit in tree.elements_with_class(&self.ctx.active_class) {
            tree.remove_class(unit, &self.ctx.active_class);
        }
        self.selection.reset();
        self.passes += 1;
        let root = tree.root();
        let created = walker::wrap_words(tree, root, &self.ctx);
        debug!(pass = self.passes, units = created, "Annotated rendered section");
        created
    }

    /// Highlight `unit`, notify the handler once, and stop the click from
    /// reaching ancestor handlers. Non-unit targets are ignored.
    pub fn activate(&mut self, tree: &mut ContentTree, unit: NodeId, event: &mut ClickEvent) {
        let Some(word) = walker::unit_word(tree, unit) else {
            trace!(%unit, "Ignoring activation of a non-unit node");
            return;
        };
        event.stop_propagation();

        self.selection
            .activate(tree, unit, &self.ctx.active_class);
        let sentence =
            sentence::extract_sentence(tree, unit, &word, self.ctx.classifier.as_ref());
        debug!(%unit, word = %word, sentence_chars = sentence.len(), "Word activated");

        if let Some(handler) = self.handler.as_mut() {
            handler(&word, &sentence);
        }
    }
}

impl ContentHook for Annotator {
    fn content_ready(&mut self, tree: &mut ContentTree) {
        self.annotate(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ElementData;
    use crate::events::dispatch_click;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn section(text: &str) -> (ContentTree, NodeId) {
        let mut tree = ContentTree::new();
        let p = tree.create_element(ElementData::new("p"));
        let t = tree.create_text(text);
        tree.append_child(tree.root(), p);
        tree.append_child(p, t);
        (tree, p)
    }

    #[test]
    fn end_to_end_click_sequence_keeps_one_active_unit() {
        let (mut tree, p) = section("The quick-fox jumps, Ünïcode café!");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut annotator = Annotator::new(AnnotatorContext::default());
        annotator.on_word_click(move |word, sentence| {
            sink.borrow_mut().push((word.to_string(), sentence.to_string()));
        });

        assert_eq!(annotator.annotate(&mut tree), 6);
        assert_eq!(tree.text_content(p), "The quick-fox jumps, Ünïcode café!");

        let units = walker::word_units(&tree, p);
        let cafe = units[5];
        let jumps = units[3];

        dispatch_click(&mut tree, &mut annotator, cafe);
        assert_eq!(tree.elements_with_class("active"), vec![cafe]);

        dispatch_click(&mut tree, &mut annotator, jumps);
        assert_eq!(tree.elements_with_class("active"), vec![jumps]);
        assert_eq!(annotator.selection(), Selection::Active(jumps));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("café".to_string(), " Ünïcode café!".to_string()));
        assert_eq!(seen[1], ("jumps".to_string(), "The quick-fox jumps,".to_string()));
    }

    #[test]
    fn new_pass_resets_selection() {
        let (mut tree, p) = section("Hello there.");
        let mut annotator = Annotator::new(AnnotatorContext::default());
        annotator.annotate(&mut tree);
        let unit = walker::word_units(&tree, p)[0];
        let mut event = ClickEvent::new(unit);
        annotator.activate(&mut tree, unit, &mut event);
        assert!(event.propagation_stopped());
        assert_eq!(annotator.selection().active(), Some(unit));

        let (mut next, _) = section("Another page.");
        annotator.annotate(&mut next);
        assert_eq!(annotator.selection(), Selection::Idle);
    }

    #[test]
    fn repeated_pass_over_same_tree_keeps_one_active_unit() {
        let (mut tree, p) = section("Alpha beta gamma.");
        let mut annotator = Annotator::new(AnnotatorContext::default());
        annotator.annotate(&mut tree);
        let units = walker::word_units(&tree, p);
        dispatch_click(&mut tree, &mut annotator, units[0]);

        assert_eq!(annotator.annotate(&mut tree), 0);
        assert!(tree.elements_with_class("active").is_empty());

        dispatch_click(&mut tree, &mut annotator, units[1]);
        assert_eq!(tree.elements_with_class("active"), vec![units[1]]);
    }

    #[test]
    fn activating_a_plain_node_does_nothing() {
        let (mut tree, p) = section("Hi.");
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut annotator = Annotator::new(AnnotatorContext::default());
        annotator.on_word_click(move |_, _| *counter.borrow_mut() += 1);
        annotator.annotate(&mut tree);

        let mut event = ClickEvent::new(p);
        annotator.activate(&mut tree, p, &mut event);
        assert!(!event.propagation_stopped());
        assert_eq!(*calls.borrow(), 0);
        assert!(tree.elements_with_class("active").is_empty());
    }

    #[test]
    fn context_from_config_extends_skip_tags() {
        let mut config = AppConfig::default();
        config.annotator_extra_skip_tags = vec![" NAV ".to_string(), String::new()];
        config.annotator_unit_class = "gloss".to_string();
        let ctx = AnnotatorContext::from_config(&config);
        assert!(ctx.skips("nav"));
        assert!(ctx.skips("script"));
        assert_eq!(ctx.unit_class, "gloss");
    }
}
