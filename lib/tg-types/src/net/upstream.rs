/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use super::Host;

/// A `host:port` pair for the next hop
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UpstreamAddr {
    host: Host,
    port: u16,
}

impl UpstreamAddr {
    pub fn new(host: Host, port: u16) -> Self {
        UpstreamAddr { host, port }
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn from_host_str_and_port(host: &str, port: u16) -> anyhow::Result<Self> {
        let host = Host::from_str(host)?;
        Ok(UpstreamAddr { host, port })
    }

    /// Parse an authority in the form `host[:port]`, filling in `default_port` if absent
    pub fn from_authority_with_default_port(s: &str, default_port: u16) -> anyhow::Result<Self> {
        if s.is_empty() {
            return Err(anyhow!("empty authority"));
        }

        let (host_s, port_s) = if s.starts_with('[') {
            match memchr::memchr(b']', s.as_bytes()) {
                Some(p) => {
                    let left = &s[p + 1..];
                    if left.is_empty() {
                        (s, None)
                    } else if let Some(port) = left.strip_prefix(':') {
                        (&s[..=p], Some(port))
                    } else {
                        return Err(anyhow!("unexpected data after ipv6 address"));
                    }
                }
                None => return Err(anyhow!("no closing bracket for ipv6 address")),
            }
        } else {
            match memchr::memrchr(b':', s.as_bytes()) {
                Some(p) => {
                    if memchr::memchr(b':', &s.as_bytes()[..p]).is_some() {
                        // bare ipv6 address without port
                        (s, None)
                    } else {
                        (&s[..p], Some(&s[p + 1..]))
                    }
                }
                None => (s, None),
            }
        };

        let port = match port_s {
            None | Some("") => default_port,
            Some(p) => {
                let port = u16::from_str(p).map_err(|e| anyhow!("invalid port {p}: {e}"))?;
                if port == 0 {
                    return Err(anyhow!("port 0 is not allowed"));
                }
                port
            }
        };
        UpstreamAddr::from_host_str_and_port(host_s, port)
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host.to_authority_string(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv6Addr};

    #[test]
    fn parse_with_port() {
        let addr = UpstreamAddr::from_authority_with_default_port("example.com:8443", 443).unwrap();
        assert_eq!(addr.host(), &Host::Domain("example.com".to_string()));
        assert_eq!(addr.port(), 8443);
        assert_eq!(addr.to_string(), "example.com:8443");
    }

    #[test]
    fn parse_default_port() {
        let addr = UpstreamAddr::from_authority_with_default_port("example.com", 443).unwrap();
        assert_eq!(addr.port(), 443);
    }

    #[test]
    fn parse_empty_port() {
        let addr = UpstreamAddr::from_authority_with_default_port("example.com:", 443).unwrap();
        assert_eq!(addr.to_string(), "example.com:443");

        let addr = UpstreamAddr::from_authority_with_default_port("[::1]:", 80).unwrap();
        assert_eq!(addr.to_string(), "[::1]:80");
    }

    #[test]
    fn parse_ipv6() {
        let addr = UpstreamAddr::from_authority_with_default_port("[::1]:8080", 443).unwrap();
        assert_eq!(addr.host(), &Host::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert_eq!(addr.port(), 8080);
        assert_eq!(addr.to_string(), "[::1]:8080");

        let addr = UpstreamAddr::from_authority_with_default_port("[::1]", 443).unwrap();
        assert_eq!(addr.port(), 443);

        let addr = UpstreamAddr::from_authority_with_default_port("::1", 443).unwrap();
        assert_eq!(addr.host(), &Host::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn parse_invalid() {
        assert!(UpstreamAddr::from_authority_with_default_port("", 443).is_err());
        assert!(UpstreamAddr::from_authority_with_default_port("example.com:0", 443).is_err());
        assert!(UpstreamAddr::from_authority_with_default_port("example.com:99999", 443).is_err());
        assert!(UpstreamAddr::from_authority_with_default_port("[::1", 443).is_err());
        assert!(UpstreamAddr::from_authority_with_default_port("[::1]x", 443).is_err());
    }
}
