//! Value codecs
//!
//! Text <-> record conversions selected by the `data-map` attribute.
//! Parsing never fails outright: a malformed input yields a record that
//! [`Codec::is_valid`] rejects, so callers can filter instead of unwrap.

mod ip;
mod url;

pub use self::ip::{IpCodec, IpRecord, IpType};
pub use self::url::{UrlCodec, UrlRecord};

/// Parse/render pair for one semantic value type
pub trait Codec {
    type Record;

    /// Parse trimmed text into a record
    fn parse(text: &str) -> Self::Record;

    /// Render a record back to text
    fn render(record: &Self::Record) -> String;

    /// Whether the record came from well-formed input
    fn is_valid(record: &Self::Record) -> bool;
}
