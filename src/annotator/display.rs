//! Inline/block classification used to find a word's enclosing block.
//!
//! A browser would answer this with a computed-style query. Here the host
//! supplies a [`DisplayClassifier`]; [`TagDisplay`] is the default, driven by
//! the tag name and any `display:` declaration in a `style` attribute.

pub use crate::content::DisplayOuter;
use crate::content::{ContentTree, NodeData, NodeId};
use std::collections::HashSet;

pub trait DisplayClassifier {
    fn display(&self, tree: &ContentTree, node: NodeId) -> DisplayOuter;

    fn is_inline(&self, tree: &ContentTree, node: NodeId) -> bool {
        self.display(tree, node) == DisplayOuter::Inline
    }
}

pub const DEFAULT_INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "cite", "code", "data", "dfn", "em",
    "font", "i", "kbd", "label", "mark", "q", "rb", "rp", "rt", "ruby", "s", "samp", "small",
    "span", "strike", "strong", "sub", "sup", "time", "tt", "u", "var", "wbr",
];

/// Tag-name driven classifier. Unknown tags are treated as blocks.
#[derive(Debug, Clone)]
pub struct TagDisplay {
    inline_tags: HashSet<String>,
}

impl Default for TagDisplay {
    fn default() -> Self {
        Self::new(DEFAULT_INLINE_TAGS.iter().map(|tag| tag.to_string()))
    }
}

impl TagDisplay {
    pub fn new(inline_tags: impl IntoIterator<Item = String>) -> Self {
        Self {
            inline_tags: inline_tags
                .into_iter()
                .map(|tag| tag.trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }
}

impl DisplayClassifier for TagDisplay {
    fn display(&self, tree: &ContentTree, node: NodeId) -> DisplayOuter {
        match &tree.node(node).data {
            NodeData::Document => DisplayOuter::Block,
            NodeData::Text(_) => DisplayOuter::Inline,
            NodeData::Element(el) => {
                if let Some(display) = el.attr("style").and_then(style_display) {
                    return display;
                }
                if el.word_unit || self.inline_tags.contains(&el.name) {
                    DisplayOuter::Inline
                } else {
                    DisplayOuter::Block
                }
            }
        }
    }
}

/// Outer display from the last `display:` declaration of an inline style.
fn style_display(style: &str) -> Option<DisplayOuter> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(prop, _)| prop.trim().eq_ignore_ascii_case("display"))
        .last()
        .map(|(_, value)| {
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match value.as_str() {
                "none" => DisplayOuter::None,
                "inline" | "inline-block" | "inline-flex" | "inline-grid" | "contents" => {
                    DisplayOuter::Inline
                }
                _ => DisplayOuter::Block,
            }
        })
}
