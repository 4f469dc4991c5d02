//! Wraps every word of a content tree in a clickable unit.

use super::AnnotatorContext;
use super::tokenizer::{Token, tokenize};
use crate::content::{ContentTree, ElementData, NodeData, NodeId};

/// Wrap the words below `root`, returning how many units were created.
///
/// Existing units and skipped elements are not entered, so running the walk
/// twice over the same tree leaves it unchanged.
pub fn wrap_words(tree: &mut ContentTree, root: NodeId, ctx: &AnnotatorContext) -> usize {
    let mut created = 0usize;
    // Snapshot the child list; the loop below splices into the live one.
    let children: Vec<NodeId> = tree.children(root).to_vec();

    for child in children {
        let kind = match &tree.node(child).data {
            NodeData::Text(value) => Visit::Text(value.clone()),
            NodeData::Element(el) if el.word_unit || ctx.skips(&el.name) => Visit::Skip,
            NodeData::Element(_) | NodeData::Document => Visit::Descend,
        };

        match kind {
            Visit::Text(value) => created += wrap_text_node(tree, child, &value, ctx),
            Visit::Descend => created += wrap_words(tree, child, ctx),
            Visit::Skip => {}
        }
    }

    created
}

enum Visit {
    Text(String),
    Descend,
    Skip,
}

fn wrap_text_node(
    tree: &mut ContentTree,
    node: NodeId,
    value: &str,
    ctx: &AnnotatorContext,
) -> usize {
    if value.trim().is_empty() {
        return 0;
    }
    let tokens = tokenize(value);
    if !tokens.iter().any(Token::is_word) {
        return 0;
    }

    let mut fragment = Vec::with_capacity(tokens.len());
    let mut units = 0usize;
    for token in tokens {
        match token {
            Token::Word(word) => {
                fragment.push(create_unit(tree, word, ctx));
                units += 1;
            }
            Token::Literal(text) => fragment.push(tree.create_text(text)),
        }
    }

    if tree.replace_with(node, &fragment) {
        units
    } else {
        0
    }
}

fn create_unit(tree: &mut ContentTree, word: &str, ctx: &AnnotatorContext) -> NodeId {
    let mut data = ElementData::new("span");
    data.classes.push(ctx.unit_class.clone());
    data.word_unit = true;
    let unit = tree.create_element(data);
    let text = tree.create_text(word);
    tree.append_child(unit, text);
    unit
}

/// Units below `root`, in document order.
pub fn word_units(tree: &ContentTree, root: NodeId) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|id| tree.is_word_unit(*id))
        .collect()
}

/// The word a unit was created for.
pub fn unit_word(tree: &ContentTree, unit: NodeId) -> Option<String> {
    tree.is_word_unit(unit).then(|| tree.text_content(unit))
}
