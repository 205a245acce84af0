//! Value accessor
//!
//! Reads and writes what an element "holds": the `data-val` attribute when
//! present, else the form value of inputs and textareas, else inner markup.
//! A `data-map` attribute of `IP` or `URL` routes the text through a codec.

use std::rc::Rc;

use fos_dom::Document;

use crate::codec::{Codec, IpCodec, IpRecord, UrlCodec, UrlRecord};
use crate::{Element, ElementError};

/// Codec selected by the map attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    Ip,
    Url,
}

impl Mapping {
    /// `IP` or `URL`; anything else means no mapping
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "IP" => Some(Mapping::Ip),
            "URL" => Some(Mapping::Url),
            _ => None,
        }
    }

    /// Parse one value, keeping failed parses
    pub fn parse(self, text: &str) -> Mapped {
        match self {
            Mapping::Ip => Mapped::Ip(IpCodec::parse(text)),
            Mapping::Url => Mapped::Url(UrlCodec::parse(text)),
        }
    }

    /// Parse one value per non-empty line, dropping failed parses
    pub fn parse_lines(self, text: &str) -> Vec<Mapped> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.parse(line))
            .filter(Mapped::is_valid)
            .collect()
    }
}

/// A codec record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapped {
    Ip(IpRecord),
    Url(UrlRecord),
}

impl Mapped {
    pub fn render(&self) -> String {
        match self {
            Mapped::Ip(record) => IpCodec::render(record),
            Mapped::Url(record) => UrlCodec::render(record),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Mapped::Ip(record) => IpCodec::is_valid(record),
            Mapped::Url(record) => UrlCodec::is_valid(record),
        }
    }

    pub fn as_ip(&self) -> Option<&IpRecord> {
        match self {
            Mapped::Ip(record) => Some(record),
            Mapped::Url(_) => None,
        }
    }

    pub fn as_url(&self) -> Option<&UrlRecord> {
        match self {
            Mapped::Url(record) => Some(record),
            Mapped::Ip(_) => None,
        }
    }
}

impl From<IpRecord> for Mapped {
    fn from(record: IpRecord) -> Self {
        Mapped::Ip(record)
    }
}

impl From<UrlRecord> for Mapped {
    fn from(record: UrlRecord) -> Self {
        Mapped::Url(record)
    }
}

/// Content written by [`Element::set_value`]
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Raw text; inner markup for containers
    Text(String),
    /// Elements spliced in as the new children of a container
    Nodes(Vec<Element>),
    Record(Mapped),
    /// Records, newline-joined after rendering
    Records(Vec<Mapped>),
}

impl Content {
    /// Variant name used in errors
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Nodes(_) => "node list",
            Content::Record(_) => "record",
            Content::Records(_) => "record list",
        }
    }

    /// Textual form; `None` for node lists
    pub fn to_text(&self) -> Option<String> {
        match self {
            Content::Text(text) => Some(text.clone()),
            Content::Nodes(_) => None,
            Content::Record(record) => Some(record.render()),
            Content::Records(records) => {
                Some(records.iter().map(Mapped::render).collect::<Vec<_>>().join("\n"))
            }
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Vec<Element>> for Content {
    fn from(elements: Vec<Element>) -> Self {
        Content::Nodes(elements)
    }
}

impl From<Mapped> for Content {
    fn from(record: Mapped) -> Self {
        Content::Record(record)
    }
}

impl From<IpRecord> for Content {
    fn from(record: IpRecord) -> Self {
        Content::Record(Mapped::Ip(record))
    }
}

impl From<UrlRecord> for Content {
    fn from(record: UrlRecord) -> Self {
        Content::Record(Mapped::Url(record))
    }
}

impl From<Vec<Mapped>> for Content {
    fn from(records: Vec<Mapped>) -> Self {
        Content::Records(records)
    }
}

/// Value read by [`Element::value`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// Single record of a mapped input; may be a failed parse
    Record(Mapped),
    /// Records of a mapped textarea or container, failed lines dropped
    Records(Vec<Mapped>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Mapped> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Records regardless of arity; empty for text
    pub fn into_records(self) -> Vec<Mapped> {
        match self {
            Value::Text(_) => Vec::new(),
            Value::Record(record) => vec![record],
            Value::Records(records) => records,
        }
    }
}

fn unsupported(tag: &str, content: &Content) -> ElementError {
    ElementError::UnsupportedContent { tag: tag.to_string(), kind: content.kind() }
}

impl Element {
    fn mapping(&self, doc: &Document) -> Option<Mapping> {
        doc.get_attribute(self.node(), &self.0.config.map_attribute)
            .and_then(Mapping::from_attribute)
    }

    /// Current value, `None` when the node is no longer an element
    pub fn value(&self) -> Option<Value> {
        let doc = self.0.document.borrow();
        let node = self.node();

        if let Some(raw) = doc.get_attribute(node, &self.0.config.value_attribute) {
            return Some(Value::Text(raw.to_string()));
        }

        let tag = doc.tag_name(node)?;
        let text = match tag {
            "input" | "textarea" => doc.form_value(node).unwrap_or_default(),
            _ => fos_html::inner_html(doc.tree(), node),
        };
        let text = text.trim();

        let value = match self.mapping(&doc) {
            None => Value::Text(text.to_string()),
            Some(mapping) if tag == "input" => Value::Record(mapping.parse(text)),
            Some(mapping) => Value::Records(mapping.parse_lines(text)),
        };
        Some(value)
    }

    /// Replace the value.
    ///
    /// Records render through their own codec regardless of the map
    /// attribute. Inputs reject lists, textareas and `data-val` reject node
    /// lists.
    pub fn set_value(&self, content: impl Into<Content>) -> Result<(), ElementError> {
        let content = content.into();
        let node = self.node();
        let mut doc = self.0.document.borrow_mut();

        let tag = doc.tag_name(node).ok_or(ElementError::NotAnElement(node))?.to_string();

        let value_attribute = &self.0.config.value_attribute;
        if doc.has_attribute(node, value_attribute) {
            let text = content.to_text().ok_or_else(|| unsupported(&tag, &content))?;
            doc.set_attribute(node, value_attribute, &text)?;
            return Ok(());
        }

        match (tag.as_str(), &content) {
            ("input", Content::Nodes(_) | Content::Records(_)) | ("textarea", Content::Nodes(_)) => {
                Err(unsupported(&tag, &content))
            }
            ("input" | "textarea", _) => {
                let text = content.to_text().ok_or_else(|| unsupported(&tag, &content))?;
                doc.set_form_value(node, &text)?;
                Ok(())
            }
            (_, Content::Nodes(elements)) => {
                if let Some(foreign) = elements.iter().find(|e| !Rc::ptr_eq(e.document(), &self.0.document)) {
                    return Err(ElementError::NotAnElement(foreign.node()));
                }
                let tree = doc.tree_mut();
                tree.clear_children(node);
                for element in elements {
                    tree.append_child(node, element.node())?;
                }
                tracing::debug!("{} now holds {} children", node, elements.len());
                Ok(())
            }
            _ => {
                let markup = content.to_text().unwrap_or_default();
                fos_html::set_inner_html(doc.tree_mut(), node, &markup)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::IpType;
    use crate::Registry;
    use fos_dom::NodeId;

    fn registry() -> Registry {
        Registry::new(Document::default().into_shared())
    }

    #[test]
    fn test_mapping_attribute() {
        assert_eq!(Mapping::from_attribute("IP"), Some(Mapping::Ip));
        assert_eq!(Mapping::from_attribute("URL"), Some(Mapping::Url));
        assert_eq!(Mapping::from_attribute("url"), None);
    }

    #[test]
    fn test_parse_lines_filters() {
        let records = Mapping::Ip.parse_lines("  10.0.0.1\n\n  nope \n::1\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_ip().and_then(|r| r.kind), Some(IpType::V6));
    }

    #[test]
    fn test_data_val_wins() {
        let registry = registry();
        let input = registry.from("input", None).unwrap();
        {
            let mut doc = registry.document().borrow_mut();
            doc.set_attribute(input.node(), "data-val", "stored").unwrap();
            doc.set_attribute(input.node(), "data-map", "IP").unwrap();
        }

        assert_eq!(input.value(), Some(Value::Text("stored".to_string())));
        input.set_value("  kept verbatim ").unwrap();
        assert_eq!(input.value(), Some(Value::Text("  kept verbatim ".to_string())));
        assert_eq!(registry.document().borrow().form_value(input.node()), Some(String::new()));
    }

    #[test]
    fn test_input_text_and_record() {
        let registry = registry();
        let input = registry.from("input", None).unwrap();

        input.set_value("  plain  ").unwrap();
        assert_eq!(input.value().unwrap().as_text(), Some("plain"));

        registry.document().borrow_mut().set_attribute(input.node(), "data-map", "IP").unwrap();
        input.set_value(IpCodec::parse("192.168.1.20")).unwrap();
        let value = input.value().unwrap();
        assert_eq!(value.as_record().and_then(Mapped::as_ip).and_then(|r| r.ip.as_deref()), Some("192.168.1.20"));

        input.set_value("garbage").unwrap();
        let value = input.value().unwrap();
        assert!(!value.as_record().unwrap().is_valid());
    }

    #[test]
    fn test_input_rejects_lists() {
        let registry = registry();
        let input = registry.from("input", None).unwrap();
        let records = vec![Mapping::Ip.parse("10.0.0.1")];

        assert!(matches!(
            input.set_value(records),
            Err(ElementError::UnsupportedContent { kind: "record list", .. })
        ));
    }

    #[test]
    fn test_container_markup_and_nodes() {
        let registry = registry();
        let div = registry.from("div", None).unwrap();

        div.set_value("<b>bold</b>").unwrap();
        assert_eq!(div.value().unwrap().as_text(), Some("<b>bold</b>"));

        let a = registry.from("span", None).unwrap();
        let b = registry.from("em", None).unwrap();
        div.set_value(vec![a.clone(), b.clone()]).unwrap();

        let doc = registry.document().borrow();
        let children: Vec<NodeId> = doc.tree().children(div.node()).map(|(id, _)| id).collect();
        assert_eq!(children, vec![a.node(), b.node()]);
    }

    #[test]
    fn test_container_records() {
        let registry = registry();
        let pre = registry.from("pre", None).unwrap();
        registry.document().borrow_mut().set_attribute(pre.node(), "data-map", "IP").unwrap();

        pre.set_value(vec![Mapping::Ip.parse("10.0.0.1"), Mapping::Ip.parse("10.0.0.2")]).unwrap();
        let records = pre.value().unwrap().into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].render(), "10.0.0.1");
    }
}
