//! Section markup to [`ContentTree`] conversion.

use crate::content::{ContentTree, ElementData, NodeId};
use scraper::{ElementRef, Html, Node, Selector};

/// Parse a section's (X)HTML and copy its `<body>` into a fresh tree.
/// Comments, doctypes and processing instructions are dropped.
pub fn parse_section(markup: &str) -> ContentTree {
    let document = Html::parse_document(markup);
    let mut tree = ContentTree::new();
    let root = tree.root();

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    match body {
        Some(body) => copy_element(&mut tree, root, body),
        None => copy_element(&mut tree, root, document.root_element()),
    }
    tree
}

fn copy_element(tree: &mut ContentTree, parent: NodeId, element: ElementRef<'_>) {
    let value = element.value();
    let mut data = ElementData::new(value.name());
    data.classes = value
        .attr("class")
        .map(|classes| classes.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    data.attrs = value
        .attrs()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("class"))
        .map(|(name, val)| (name.to_string(), val.to_string()))
        .collect();

    let id = tree.create_element(data);
    tree.append_child(parent, id);

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text_id = tree.create_text(&**text);
                tree.append_child(id, text_id);
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    copy_element(tree, id, child_el);
                }
            }
            _ => {}
        }
    }
}

/// Wrap plain-text paragraphs into minimal section markup.
pub fn paragraphs_to_markup(paragraphs: &[String]) -> String {
    let mut markup = String::from("<html><body>");
    for paragraph in paragraphs {
        markup.push_str("<p>");
        markup.push_str(
            &paragraph
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
        );
        markup.push_str("</p>");
    }
    markup.push_str("</body></html>");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_body_structure_and_drops_comments() {
        let tree = parse_section(
            r#"<?xml version="1.0"?><html><head><title>T</title></head>
            <body><!-- note --><p class="lead first" id="p1">Hi <em>there</em>.</p></body></html>"#,
        );
        let body = tree.children(tree.root())[0];
        assert_eq!(tree.element(body).map(|el| el.name.as_str()), Some("body"));

        let p = tree.children(body)[0];
        let el = tree.element(p).unwrap();
        assert_eq!(el.classes, vec!["lead", "first"]);
        assert_eq!(el.attr("id"), Some("p1"));
        assert_eq!(el.attr("class"), None);
        assert_eq!(tree.to_html(p), "<p class=\"lead first\" id=\"p1\">Hi <em>there</em>.</p>");
    }

    #[test]
    fn class_order_survives_a_round_trip() {
        let tree = parse_section(r#"<body><p class="z-last  a-first m-mid">x</p></body>"#);
        let body = tree.children(tree.root())[0];
        let p = tree.children(body)[0];
        assert_eq!(
            tree.to_html(p),
            "<p class=\"z-last a-first m-mid\">x</p>"
        );
    }

    #[test]
    fn escapes_plain_text_paragraphs() {
        let markup = paragraphs_to_markup(&["a < b & c".to_string(), "next".to_string()]);
        let tree = parse_section(&markup);
        let body = tree.children(tree.root())[0];
        assert_eq!(tree.children(body).len(), 2);
        assert_eq!(tree.text_content(body), "a < b & cnext");
    }
}
