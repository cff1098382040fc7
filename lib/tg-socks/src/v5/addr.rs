/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use tg_types::net::{Host, UpstreamAddr};

use super::{SocksNegotiationError, SocksRequestParseError};

const ATYP_IPV4: u8 = 0x01;
const ATYP_DOMAIN: u8 = 0x03;
const ATYP_IPV6: u8 = 0x04;

/// Read `ATYP ADDR PORT` from the client
pub(super) async fn read_upstream<R>(
    clt_r: &mut R,
) -> Result<UpstreamAddr, SocksRequestParseError>
where
    R: AsyncRead + Unpin,
{
    let host = match clt_r.read_u8().await? {
        ATYP_IPV4 => {
            let mut octets = [0u8; 4];
            clt_r.read_exact(&mut octets).await?;
            Host::Ip(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        ATYP_IPV6 => {
            let mut octets = [0u8; 16];
            clt_r.read_exact(&mut octets).await?;
            Host::from_ip(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        ATYP_DOMAIN => {
            let len = clt_r.read_u8().await?;
            if len == 0 {
                return Err(SocksNegotiationError::InvalidDomainString.into());
            }
            let mut name = vec![0u8; usize::from(len)];
            clt_r.read_exact(&mut name).await?;
            let port = clt_r.read_u16().await?;
            let name = String::from_utf8(name)
                .map_err(|_| SocksNegotiationError::InvalidDomainString)?;
            return UpstreamAddr::from_host_str_and_port(&name, port)
                .map_err(|_| SocksNegotiationError::InvalidDomainString.into());
        }
        _ => return Err(SocksNegotiationError::InvalidAddrType.into()),
    };
    let port = clt_r.read_u16().await?;
    Ok(UpstreamAddr::new(host, port))
}

/// Put `ATYP ADDR PORT` of a bound address, IPv4-mapped addresses are sent as IPv4
pub(super) fn put_socket_addr<B: BufMut>(buf: &mut B, addr: SocketAddr) {
    match addr.ip().to_canonical() {
        IpAddr::V4(ip4) => {
            buf.put_u8(ATYP_IPV4);
            buf.put_slice(&ip4.octets());
        }
        IpAddr::V6(ip6) => {
            buf.put_u8(ATYP_IPV6);
            buf.put_slice(&ip6.octets());
        }
    }
    buf.put_u16(addr.port());
}
