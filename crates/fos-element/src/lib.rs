//! fOS Element
//!
//! Lightweight wrappers around document elements:
//! - One registered wrapper per element, tracked by an identity cache
//! - `on`/`once`/`off`/`emit` multiplexed onto one native listener per event
//! - Value access through `data-val` overrides and `data-map` codecs (IP, URL)
//! - Coarse enabled/disabled state, render and erase
//!
//! # Example
//! ```rust,ignore
//! use fos_element::{Callback, Registry};
//!
//! let registry = Registry::new(fos_dom::Document::default().into_shared());
//! let button = registry.from("button", None).unwrap();
//! button.on("click", &Callback::new(|_| Ok(None)));
//! ```

mod cache;
mod codec;
mod config;
mod element;
mod error;
mod events;
mod registry;
mod state;
mod value;

pub use cache::IdentityCache;
pub use codec::{Codec, IpCodec, IpRecord, IpType, UrlCodec, UrlRecord};
pub use config::Config;
pub use element::{Element, Selection, Source, Template};
pub use error::ElementError;
pub use events::{Callback, Emission, EventData};
pub use registry::Registry;
pub use value::{Content, Mapped, Mapping, Value};

pub use fos_dom::{Document, NodeId, SharedDocument};
