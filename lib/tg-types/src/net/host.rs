/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use anyhow::anyhow;

/// Target host of a proxy request
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Host {
    Ip(IpAddr),
    /// ascii form, lowercased
    Domain(String),
}

impl Host {
    /// IPv4-mapped IPv6 addresses are stored as IPv4
    pub fn from_ip(ip: IpAddr) -> Self {
        Host::Ip(ip.to_canonical())
    }

    fn parse_domain(s: &str) -> anyhow::Result<Self> {
        if s.contains(|c: char| c.is_ascii_whitespace() || matches!(c, '/' | '[' | ']')) {
            return Err(anyhow!("invalid character in domain"));
        }
        match idna::domain_to_ascii(s) {
            Ok(domain) if domain.is_empty() => Err(anyhow!("empty domain")),
            Ok(domain) => Ok(Host::Domain(domain)),
            Err(e) => Err(anyhow!("invalid domain: {e}")),
        }
    }

    /// Format the host for use in an authority, with ipv6 in square brackets
    pub fn to_authority_string(&self) -> String {
        match self {
            Host::Ip(IpAddr::V6(ip6)) => format!("[{ip6}]"),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ip(ip) => ip.fmt(f),
            Host::Domain(domain) => f.write_str(domain),
        }
    }
}

impl FromStr for Host {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(anyhow!("empty string"));
        }
        if let Some(inner) = s.strip_prefix('[') {
            return inner
                .strip_suffix(']')
                .and_then(|v| Ipv6Addr::from_str(v).ok())
                .map(|ip6| Host::from_ip(IpAddr::V6(ip6)))
                .ok_or_else(|| anyhow!("invalid ipv6 address in square brackets"));
        }
        match IpAddr::from_str(s) {
            Ok(ip) => Ok(Host::from_ip(ip)),
            Err(_) => Host::parse_domain(s),
        }
    }
}
