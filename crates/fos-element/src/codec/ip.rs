//! IP address codec

use std::net::IpAddr;

use super::Codec;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpType {
    V4,
    V6,
}

/// Parsed IP address; `kind` is `None` when parsing failed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpRecord {
    pub ip: Option<String>,
    pub kind: Option<IpType>,
}

impl From<IpAddr> for IpRecord {
    fn from(addr: IpAddr) -> Self {
        let kind = match addr {
            IpAddr::V4(_) => IpType::V4,
            IpAddr::V6(_) => IpType::V6,
        };
        Self { ip: Some(addr.to_string()), kind: Some(kind) }
    }
}

/// IPv4/IPv6 codec
pub struct IpCodec;

impl Codec for IpCodec {
    type Record = IpRecord;

    fn parse(text: &str) -> IpRecord {
        let text = text.trim();
        // Bracketed IPv6 as written in URLs
        let bare = text
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(text);
        bare.parse::<IpAddr>().map(IpRecord::from).unwrap_or_default()
    }

    fn render(record: &IpRecord) -> String {
        record.ip.clone().unwrap_or_default()
    }

    fn is_valid(record: &IpRecord) -> bool {
        record.kind.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v4_and_v6() {
        let v4 = IpCodec::parse(" 192.168.0.1 ");
        assert_eq!(v4.kind, Some(IpType::V4));
        assert_eq!(IpCodec::render(&v4), "192.168.0.1");

        let v6 = IpCodec::parse("[2001:db8:0:0:0:0:0:1]");
        assert_eq!(v6.kind, Some(IpType::V6));
        assert_eq!(IpCodec::render(&v6), "2001:db8::1");
    }

    #[test]
    fn test_parse_failure() {
        let bad = IpCodec::parse("300.1.1.1");
        assert!(!IpCodec::is_valid(&bad));
        assert_eq!(bad, IpRecord::default());
        assert_eq!(IpCodec::render(&bad), "");
    }
}
