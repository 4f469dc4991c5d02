//! Section rendering: book markup in, content trees out.
//!
//! A [`Rendition`] displays one section at a time. Every display is a fresh
//! render pass: the section markup is parsed into a new [`ContentTree`] and
//! each [`ContentHook`] sees it exactly once before the host shows it.

pub mod html;

use crate::content::ContentTree;
use anyhow::{Result, anyhow};
use tracing::{debug, info};

/// Anything that can hand out section markup in reading order.
pub trait SectionSource {
    fn title(&self) -> &str;
    fn section_count(&self) -> usize;
    fn section_markup(&self, index: usize) -> Option<&str>;
}

/// Notified once per render pass, before the content is shown.
pub trait ContentHook {
    fn content_ready(&mut self, tree: &mut ContentTree);
}

pub struct Rendition {
    source: Box<dyn SectionSource>,
    current: Option<usize>,
    tree: ContentTree,
}

impl Rendition {
    pub fn new(source: Box<dyn SectionSource>) -> Self {
        info!(
            title = source.title(),
            sections = source.section_count(),
            "Created rendition"
        );
        Self {
            source,
            current: None,
            tree: ContentTree::new(),
        }
    }

    pub fn title(&self) -> &str {
        self.source.title()
    }

    pub fn section_count(&self) -> usize {
        self.source.section_count()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ContentTree {
        &mut self.tree
    }

    /// Render section `index`, replacing the previous tree.
    pub fn display(&mut self, index: usize, hooks: &mut [&mut dyn ContentHook]) -> Result<()> {
        let markup = self.source.section_markup(index).ok_or_else(|| {
            anyhow!(
                "Section {} out of range (book has {})",
                index + 1,
                self.source.section_count()
            )
        })?;
        let mut tree = html::parse_section(markup);
        for hook in hooks.iter_mut() {
            hook.content_ready(&mut tree);
        }
        debug!(
            section = index + 1,
            nodes = tree.len(),
            "Rendered section"
        );
        self.tree = tree;
        self.current = Some(index);
        Ok(())
    }

    /// Index of the following section, if any.
    pub fn next_index(&self) -> Option<usize> {
        let next = self.current.map_or(0, |idx| idx + 1);
        (next < self.section_count()).then_some(next)
    }

    pub fn prev_index(&self) -> Option<usize> {
        self.current.and_then(|idx| idx.checked_sub(1))
    }
}

/// In-memory sections, used for plain-text books and tests.
#[derive(Debug, Clone)]
pub struct StaticSections {
    pub title: String,
    pub sections: Vec<String>,
}

impl SectionSource for StaticSections {
    fn title(&self) -> &str {
        &self.title
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_markup(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHook {
        calls: usize,
    }

    impl ContentHook for CountingHook {
        fn content_ready(&mut self, tree: &mut ContentTree) {
            self.calls += 1;
            let marker = tree.create_text("!");
            let root = tree.root();
            tree.append_child(root, marker);
        }
    }

    fn rendition() -> Rendition {
        Rendition::new(Box::new(StaticSections {
            title: "Test".to_string(),
            sections: vec![
                "<html><body><p>First.</p></body></html>".to_string(),
                "<html><body><p>Second.</p></body></html>".to_string(),
            ],
        }))
    }

    #[test]
    fn hooks_run_once_per_display() {
        let mut rendition = rendition();
        let mut hook = CountingHook { calls: 0 };
        rendition.display(0, &mut [&mut hook as &mut dyn ContentHook]).unwrap();
        assert_eq!(hook.calls, 1);
        assert!(rendition.tree().text_content(rendition.tree().root()).ends_with('!'));

        rendition.display(1, &mut [&mut hook as &mut dyn ContentHook]).unwrap();
        assert_eq!(hook.calls, 2);
        assert_eq!(rendition.current_index(), Some(1));
        assert_eq!(rendition.next_index(), None);
        assert_eq!(rendition.prev_index(), Some(0));
    }

    #[test]
    fn out_of_range_section_is_an_error() {
        let mut rendition = rendition();
        assert!(rendition.display(7, &mut []).is_err());
        assert_eq!(rendition.current_index(), None);
        assert_eq!(rendition.next_index(), Some(0));
    }
}
