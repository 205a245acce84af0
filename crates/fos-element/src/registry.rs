//! Registry - per-document wrapper context
//!
//! Owns the document handle, the identity cache and the configuration that
//! wrappers are constructed against. Independent documents get independent
//! registries.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{NodeId, SharedDocument};

use crate::element::{self, Selection, Source, Template};
use crate::{Config, Element, IdentityCache};

pub(crate) struct RegistryInner {
    pub(crate) document: SharedDocument,
    pub(crate) cache: RefCell<IdentityCache>,
    pub(crate) config: Rc<Config>,
}

/// Wrapper registry for one document
#[derive(Clone)]
pub struct Registry(pub(crate) Rc<RegistryInner>);

impl Registry {
    /// Registry with default configuration
    pub fn new(document: SharedDocument) -> Self {
        Self::with_config(document, Config::default())
    }

    /// Registry with custom configuration
    pub fn with_config(document: SharedDocument, config: Config) -> Self {
        Self(Rc::new(RegistryInner {
            document,
            cache: RefCell::new(IdentityCache::new()),
            config: Rc::new(config),
        }))
    }

    /// The wrapped document
    pub fn document(&self) -> &SharedDocument {
        &self.0.document
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// Construct a wrapper for an element or a new element of a tag.
    ///
    /// Always returns a fresh wrapper; it is only registered when its node is
    /// not cached yet. Use [`Registry::query`] to get the registered one.
    pub fn from<'a>(&self, source: impl Into<Source<'a>>, template: Option<Template>) -> Option<Element> {
        element::construct(self, source.into(), template)
    }

    /// Resolve a selector against the whole document
    pub fn query(&self, selector: &str) -> Option<Selection> {
        element::resolve(self, NodeId::ROOT, selector)
    }

    /// Registered wrapper for a node, if any
    pub fn cached(&self, node: NodeId) -> Option<Element> {
        self.0.cache.borrow().lookup(node)
    }

    /// Registered wrapper for a node, constructing and registering one on a miss
    pub fn wrap(&self, node: NodeId) -> Option<Element> {
        self.cached(node).or_else(|| self.from(node, None))
    }

    /// Number of registered wrappers
    pub fn cache_len(&self) -> usize {
        self.0.cache.borrow().len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("cached", &self.cache_len())
            .field("config", &self.0.config)
            .finish()
    }
}
