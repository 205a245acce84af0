//! URL codec
//!
//! Splits a URL into the parts forms care about. Named hosts are split into
//! a registrable `domain` (last two labels) and a `subdomain`; IP hosts go
//! to `host`. Input without a scheme ("example.com/a") is accepted and
//! recorded without a protocol.

use ::url::{Host, Url};

use super::Codec;

/// Parsed URL; `domain` and `host` are both `None` when parsing failed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlRecord {
    pub protocol: Option<String>,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub hash: Option<String>,
}

/// URL codec
pub struct UrlCodec;

/// Parse `text`, adding `https://` when it names no scheme.
///
/// Returns the URL and whether the scheme was implied.
fn parse_lenient(text: &str) -> Option<(Url, bool)> {
    if text.contains("://") {
        return Url::parse(text).ok().map(|url| (url, false));
    }
    Url::parse(&format!("https://{}", text)).ok().map(|url| (url, true))
}

impl Codec for UrlCodec {
    type Record = UrlRecord;

    fn parse(text: &str) -> UrlRecord {
        let text = text.trim();
        if text.is_empty() {
            return UrlRecord::default();
        }
        let Some((url, implied_scheme)) = parse_lenient(text) else {
            return UrlRecord::default();
        };

        // "example.com" stays path-less instead of gaining the implied "/"
        let bare_host = implied_scheme && url.path() == "/" && !text.contains('/');

        let mut record = UrlRecord {
            protocol: (!implied_scheme).then(|| url.scheme().to_string()),
            port: url.port(),
            path: if bare_host { String::new() } else { url.path().to_string() },
            query: url.query().map(str::to_string),
            hash: url.fragment().map(str::to_string),
            ..UrlRecord::default()
        };

        match url.host() {
            Some(Host::Domain(name)) => {
                let labels: Vec<&str> = name.split('.').collect();
                if labels.len() > 2 {
                    let split = labels.len() - 2;
                    record.subdomain = Some(labels[..split].join("."));
                    record.domain = Some(labels[split..].join("."));
                } else {
                    record.domain = Some(name.to_string());
                }
            }
            Some(Host::Ipv4(addr)) => {
                // Shorthand forms such as "42" (0.0.0.42) are not addresses as written
                let addr = addr.to_string();
                if !text.contains(&addr) {
                    return UrlRecord::default();
                }
                record.host = Some(addr);
            }
            Some(Host::Ipv6(addr)) => record.host = Some(addr.to_string()),
            None => return UrlRecord::default(),
        }

        record
    }

    fn render(record: &UrlRecord) -> String {
        let mut out = String::new();
        if let Some(protocol) = &record.protocol {
            out.push_str(protocol);
            out.push_str("://");
        }
        if let Some(domain) = &record.domain {
            if let Some(subdomain) = &record.subdomain {
                out.push_str(subdomain);
                out.push('.');
            }
            out.push_str(domain);
        } else if let Some(host) = &record.host {
            if host.contains(':') {
                out.push('[');
                out.push_str(host);
                out.push(']');
            } else {
                out.push_str(host);
            }
        }
        if let Some(port) = record.port {
            out.push(':');
            out.push_str(&port.to_string());
        }
        out.push_str(&record.path);
        if let Some(query) = &record.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(hash) = &record.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }

    fn is_valid(record: &UrlRecord) -> bool {
        record.domain.is_some() || record.host.is_some()
    }
}
