//! Reader stylesheet injected into every rendered section.

use crate::annotator::AnnotatorContext;
use crate::content::{ContentTree, ElementData, NodeData};
use crate::render::ContentHook;
use crate::settings::ReaderSettings;

/// Stylesheet for body text and clickable word units.
pub fn stylesheet(settings: &ReaderSettings, unit_class: &str, active_class: &str) -> String {
    let text_rules = format!(
        "font-size: {}px !important; line-height: {} !important; font-family: {} !important;",
        settings.font_size, settings.line_height, settings.font_family
    );
    format!(
        "p {{ {text_rules} color: #333 !important; text-align: justify; }}\n\
         div {{ {text_rules} }}\n\
         span.{unit_class} {{ cursor: pointer; border-radius: 3px; }}\n\
         span.{unit_class}:hover {{ background-color: rgba(33, 150, 243, 0.2); }}\n\
         span.{unit_class}.{active_class} {{ background-color: #007acc; color: white; }}\n"
    )
}

/// Content hook that prepends the stylesheet to the section body.
pub struct ThemeHook {
    css: String,
}

impl ThemeHook {
    pub fn new(settings: &ReaderSettings, ctx: &AnnotatorContext) -> Self {
        Self {
            css: stylesheet(settings, &ctx.unit_class, &ctx.active_class),
        }
    }
}

impl ContentHook for ThemeHook {
    fn content_ready(&mut self, tree: &mut ContentTree) {
        let root = tree.root();
        let host = tree
            .children(root)
            .iter()
            .copied()
            .find(|id| matches!(tree.node(*id).data, NodeData::Element(_)))
            .unwrap_or(root);

        let mut data = ElementData::new("style");
        data.attrs
            .push(("data-source".to_string(), "reader-theme".to_string()));
        let style = tree.create_element(data);
        let css = tree.create_text(self.css.clone());
        tree.append_child(style, css);

        tree.insert_child(host, 0, style);
    }
}
