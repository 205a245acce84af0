//! Element Query and Methods
//!
//! querySelector, querySelectorAll, closest, matches over a small selector
//! grammar: selector lists, compound selectors (`tag`, `*`, `#id`, `.class`,
//! `[attr]`, `[attr=value]`) joined by descendant or `>` combinators.

use crate::{DomError, DomResult, DomTree, ElementData, NodeId};

/// Element query trait
pub trait ElementQuery {
    /// First descendant of `root` matching the selector, in document order
    fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>>;

    /// All descendants of `root` matching the selector, in document order
    fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>>;

    /// Closest inclusive ancestor matching the selector
    fn closest(&self, element: NodeId, selector: &str) -> DomResult<Option<NodeId>>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> DomResult<bool>;
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    /// Compounds left to right; the combinator links a compound to the one before it
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrSelector {
    Exists(String),
    Equals(String, String),
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> DomResult<Self> {
        let alternatives = input
            .split(',')
            .map(parse_complex)
            .collect::<DomResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    /// Whether `element` matches any alternative of the list
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(tree, element))
    }
}

fn syntax(input: &str, reason: &str) -> DomError {
    DomError::Syntax(format!("'{}': {}", input.trim(), reason))
}

fn parse_complex(input: &str) -> DomResult<Complex> {
    let mut parts = Vec::new();
    let mut pending = Combinator::Descendant;
    let mut chars = input.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '>' {
            if parts.is_empty() || pending == Combinator::Child {
                return Err(syntax(input, "dangling '>'"));
            }
            pending = Combinator::Child;
            chars.next();
            continue;
        }

        let mut token = String::new();
        let mut in_brackets = false;
        while let Some(&c) = chars.peek() {
            if !in_brackets && (c.is_whitespace() || c == '>') {
                break;
            }
            match c {
                '[' => in_brackets = true,
                ']' => in_brackets = false,
                _ => {}
            }
            token.push(c);
            chars.next();
        }
        if in_brackets {
            return Err(syntax(input, "unterminated '['"));
        }

        parts.push((pending, parse_compound(input, &token)?));
        pending = Combinator::Descendant;
    }

    if parts.is_empty() {
        return Err(syntax(input, "empty selector"));
    }
    if pending == Combinator::Child {
        return Err(syntax(input, "trailing '>'"));
    }
    Ok(Complex { parts })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    rest.split_at(end)
}

fn parse_compound(input: &str, token: &str) -> DomResult<Compound> {
    let mut compound = Compound::default();
    let mut rest = token;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (tag, after) = take_ident(rest);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = after;
    }

    while let Some(c) = rest.chars().next() {
        match c {
            '#' | '.' => {
                let (name, after) = take_ident(&rest[1..]);
                if name.is_empty() {
                    return Err(syntax(input, "expected a name after '#' or '.'"));
                }
                if c == '#' {
                    compound.ids.push(name.to_string());
                } else {
                    compound.classes.push(name.to_string());
                }
                rest = after;
            }
            '[' => {
                let close = rest.find(']').ok_or_else(|| syntax(input, "unterminated '['"))?;
                let body = &rest[1..close];
                let attr = match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|q| q == '"' || q == '\'');
                        AttrSelector::Equals(name.trim().to_ascii_lowercase(), value.to_string())
                    }
                    None => AttrSelector::Exists(body.trim().to_ascii_lowercase()),
                };
                if matches!(&attr, AttrSelector::Exists(n) | AttrSelector::Equals(n, _) if n.is_empty()) {
                    return Err(syntax(input, "empty attribute name"));
                }
                compound.attrs.push(attr);
                rest = &rest[close + 1..];
            }
            _ => return Err(syntax(input, "unexpected character")),
        }
    }

    Ok(compound)
}

impl Compound {
    fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if elem.tag_name != *tag {
                return false;
            }
        }
        if !self.ids.iter().all(|id| elem.id() == Some(id.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|class| elem.classes().any(|c| c == class)) {
            return false;
        }
        self.attrs.iter().all(|attr| match attr {
            AttrSelector::Exists(name) => elem.attrs.has_attribute(name),
            AttrSelector::Equals(name, value) => elem.get_attr(name) == Some(value.as_str()),
        })
    }
}

impl Complex {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.matches_from(tree, element, self.parts.len() - 1)
    }

    /// Match `parts[..=index]` with `parts[index]` anchored at `element`
    fn matches_from(&self, tree: &DomTree, element: NodeId, index: usize) -> bool {
        let Some(elem) = tree.get(element).and_then(|n| n.as_element()) else {
            return false;
        };
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(elem) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => tree
                .parent(element)
                .is_some_and(|parent| self.matches_from(tree, parent, index - 1)),
            Combinator::Descendant => tree
                .ancestors(element)
                .any(|ancestor| self.matches_from(tree, ancestor, index - 1)),
        }
    }
}

impl ElementQuery for DomTree {
    fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }

    fn closest(&self, element: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(std::iter::once(element)
            .chain(self.ancestors(element))
            .find(|&id| selector.matches(self, id)))
    }

    fn matches(&self, element: NodeId, selector: &str) -> DomResult<bool> {
        Ok(Selector::parse(selector)?.matches(self, element))
    }
}
