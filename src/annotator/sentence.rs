//! Sentence extraction around a clicked word.

use super::display::DisplayClassifier;
use crate::content::{ContentTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

/// A run of non-terminators followed by its (possibly empty) terminator run.
static RE_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?,;:\n\r]+[.!?,;:\n\r]*").unwrap());

/// Nearest ancestor of `unit` that is not inline. The document root counts
/// as a block; `None` only for a detached unit.
pub fn enclosing_block(
    tree: &ContentTree,
    unit: NodeId,
    classifier: &dyn DisplayClassifier,
) -> Option<NodeId> {
    tree.ancestors(unit)
        .find(|&ancestor| ancestor == tree.root() || !classifier.is_inline(tree, ancestor))
}

/// Split `text` into candidate sentences, each keeping its terminator run.
pub fn split_candidates(text: &str) -> Vec<&str> {
    RE_SENTENCE.find_iter(text).map(|m| m.as_str()).collect()
}

/// First candidate of `block_text` that contains `word`, or the whole text.
pub fn sentence_containing(block_text: &str, word: &str) -> String {
    split_candidates(block_text)
        .into_iter()
        .find(|candidate| candidate.contains(word))
        .unwrap_or(block_text)
        .to_string()
}

/// Sentence for `word` as rendered inside the enclosing block of `unit`.
///
/// Matching is case-sensitive against the display form of the word.
pub fn extract_sentence(
    tree: &ContentTree,
    unit: NodeId,
    word: &str,
    classifier: &dyn DisplayClassifier,
) -> String {
    let Some(block) = enclosing_block(tree, unit, classifier) else {
        return word.to_string();
    };
    let display = |tree: &ContentTree, id: NodeId| classifier.display(tree, id);
    let text = tree.rendered_text(block, &display);
    sentence_containing(&text, word)
}
