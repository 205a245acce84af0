//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, plus the innerHTML/outerHTML
//! serializer used when element content is read back as markup.

mod parser;
mod serializer;

pub use fos_dom::Document;
pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

use fos_dom::{DomError, DomResult, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// `element.innerHTML`
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// `element.outerHTML`
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}

/// `element.innerHTML = markup`: drop the current children, then parse
/// `markup` as a fragment and append the result.
pub fn set_inner_html(tree: &mut DomTree, node: NodeId, markup: &str) -> DomResult<Vec<NodeId>> {
    let target = tree.get(node).ok_or(DomError::NotFound(node))?;
    if !target.can_have_children() {
        return Err(DomError::InvalidNodeType(node));
    }
    tree.clear_children(node);
    HtmlParser::new().parse_fragment_into(tree, node, markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_html_roundtrip() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        set_inner_html(&mut tree, div, "<b>bold</b> and <i>italic</i>").unwrap();

        assert_eq!(inner_html(&tree, div), "<b>bold</b> and <i>italic</i>");
        assert_eq!(tree.text_content(div), "bold and italic");
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        set_inner_html(&mut tree, div, "<p>one</p><p>two</p>").unwrap();
        set_inner_html(&mut tree, div, "plain").unwrap();

        assert_eq!(tree.children(div).count(), 1);
        assert_eq!(inner_html(&tree, div), "plain");
    }

    #[test]
    fn test_set_inner_html_on_text_node() {
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert_eq!(set_inner_html(&mut tree, text, "<b>y</b>"), Err(DomError::InvalidNodeType(text)));
    }
}
