//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into our arena DOM.

use fos_dom::{Document, DomResult, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.tree().root();
        for child in dom.document.children.borrow().iter() {
            // The arena root is a document node, so conversion cannot fail here
            let _ = self.convert_node(child, document.tree_mut(), root, false);
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `markup` as body content and append the resulting nodes to `parent`.
    ///
    /// Whitespace-only text is kept so that innerHTML reads back what was written.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        markup: &str,
    ) -> DomResult<Vec<NodeId>> {
        // Start in body mode so leading whitespace, comments and metadata tags stay in place
        let source = format!("<!DOCTYPE html><html><head></head><body>{}", markup);
        let dom = parse_document(RcDom::default(), Default::default()).one(source);
        let body = find_child(&dom.document, "html").and_then(|html| find_child(&html, "body"));

        let mut created = Vec::new();
        if let Some(body) = body {
            for child in body.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, tree, parent, true)? {
                    created.push(id);
                }
            }
        }
        tracing::trace!("fragment produced {} top-level nodes under {}", created.len(), parent);
        Ok(created)
    }

    /// Convert an RcDom node and its subtree, appending it under `parent`
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
        keep_whitespace: bool,
    ) -> DomResult<Option<NodeId>> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !keep_whitespace && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                id
            }
            // Doctypes and processing instructions have no arena counterpart
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };

        tree.append_child(parent, id)?;
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id, keep_whitespace)?;
        }
        Ok(Some(id))
    }
}

fn find_child(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.tree().text_content(doc.body()), "Hello");
    }

    #[test]
    fn test_parse_attributes() {
        let doc = HtmlParser::new().parse("<textarea id=\"urls\" data-map=\"URL\"></textarea>");
        let textarea = doc.get_element_by_id("urls").unwrap();

        assert_eq!(doc.tag_name(textarea), Some("textarea"));
        assert_eq!(doc.get_attribute(textarea, "data-map"), Some("URL"));
    }

    #[test]
    fn test_fragment_keeps_order_and_whitespace() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let created = HtmlParser::new()
            .parse_fragment_into(&mut tree, div, "<span>a</span> <em>b</em>")
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(tree.tag_name(created[0]), Some("span"));
        assert_eq!(tree.get(created[1]).and_then(|n| n.as_text()), Some(" "));
        assert_eq!(tree.tag_name(created[2]), Some("em"));
    }
}
