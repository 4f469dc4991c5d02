//! Arena-backed content tree for one rendered section.
//!
//! The renderer builds a fresh tree for every section it displays and hands
//! it to content hooks by `&mut` for the duration of the render pass. Nodes
//! are never freed individually: a replaced node is simply detached from its
//! parent and the whole arena is dropped when the section is replaced.

use std::fmt;

/// Index of a node inside a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outer display type of a node, as a renderer would compute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOuter {
    Block,
    Inline,
    None,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
    /// Set only on spans created by the annotator for a word token.
    pub word_unit: bool,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Tags whose text never reaches the reader.
const HIDDEN_TAGS: &[&str] = &["script", "style", "head", "title", "template"];

impl ContentTree {
    /// Create an empty tree containing only a document root.
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node {
                id: root,
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_word_unit(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.word_unit)
    }

    /// Allocate a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(value.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it first if
    /// it already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Attach `child` at `index` among `parent`'s children (clamped).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|child| *child != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Replace `old` in its parent's child list with `replacements`, keeping
    /// their order. Returns `false` when `old` is detached.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.node(old).parent else {
            return false;
        };
        let Some(position) = self
            .node(parent)
            .children
            .iter()
            .position(|child| *child == old)
        else {
            return false;
        };
        for &id in replacements {
            self.detach(id);
            self.node_mut(id).parent = Some(parent);
        }
        self.node_mut(parent)
            .children
            .splice(position..=position, replacements.iter().copied());
        self.node_mut(old).parent = None;
        true
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Attached nodes carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Concatenated value of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(value) = self.text(id) {
            out.push_str(value);
        }
        for child in self.descendants(id) {
            if let Some(value) = self.text(child) {
                out.push_str(value);
            }
        }
        out
    }

    /// Approximation of a browser's `innerText`: hidden tags and
    /// `display: none` subtrees contribute nothing, `<br>` is a line break
    /// and every block element is surrounded by line breaks.
    pub fn rendered_text(
        &self,
        id: NodeId,
        display: &dyn Fn(&ContentTree, NodeId) -> DisplayOuter,
    ) -> String {
        let mut out = String::new();
        self.collect_rendered(id, display, &mut out, true);
        out.trim_matches('\n').to_string()
    }

    fn collect_rendered(
        &self,
        id: NodeId,
        display: &dyn Fn(&ContentTree, NodeId) -> DisplayOuter,
        out: &mut String,
        is_start: bool,
    ) {
        match &self.node(id).data {
            NodeData::Text(value) => out.push_str(value),
            NodeData::Document => {
                for &child in self.children(id) {
                    self.collect_rendered(child, display, out, false);
                }
            }
            NodeData::Element(el) => {
                if HIDDEN_TAGS.contains(&el.name.as_str()) {
                    return;
                }
                if el.name == "br" {
                    out.push('\n');
                    return;
                }
                let outer = display(self, id);
                if outer == DisplayOuter::None && !is_start {
                    return;
                }
                let block = !is_start && outer == DisplayOuter::Block;
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for &child in self.children(id) {
                    self.collect_rendered(child, display, out, false);
                }
                if block && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    /// Serialize the subtree at `id` back into markup.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Document => {
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
            }
            NodeData::Text(value) => out.push_str(&escape_text(value)),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                if !el.classes.is_empty() {
                    let classes = escape_attr(&el.classes.join(" "));
                    out.push_str(&format!(" class=\"{classes}\""));
                }
                for (key, value) in &el.attrs {
                    out.push_str(&format!(" {key}=\"{}\"", escape_attr(value)));
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a ContentTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
