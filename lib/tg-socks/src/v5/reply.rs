/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::SocketAddr;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::VERSION;
use super::addr::put_socket_addr;

#[derive(Debug)]
pub enum Socks5Reply {
    Succeeded(SocketAddr),
    GeneralServerFailure,
    ForbiddenByRule,
    NetworkUnreachable,
    HostUnreachable,
    ConnectionRefused,
    TtlExpired,
    CommandNotSupported,
    AddressTypeNotSupported,
}

impl Socks5Reply {
    pub const fn code(&self) -> u8 {
        match self {
            Socks5Reply::Succeeded(_) => 0x00,
            Socks5Reply::GeneralServerFailure => 0x01,
            Socks5Reply::ForbiddenByRule => 0x02,
            Socks5Reply::NetworkUnreachable => 0x03,
            Socks5Reply::HostUnreachable => 0x04,
            Socks5Reply::ConnectionRefused => 0x05,
            Socks5Reply::TtlExpired => 0x06,
            Socks5Reply::CommandNotSupported => 0x07,
            Socks5Reply::AddressTypeNotSupported => 0x08,
        }
    }

    /// Map an upstream connect error to the closest reply code
    pub fn from_connect_error(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => Socks5Reply::ConnectionRefused,
            io::ErrorKind::TimedOut => Socks5Reply::TtlExpired,
            io::ErrorKind::NetworkUnreachable => Socks5Reply::NetworkUnreachable,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NotFound => {
                Socks5Reply::HostUnreachable
            }
            _ => Socks5Reply::GeneralServerFailure,
        }
    }

    pub async fn send<W>(&self, clt_w: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let bind_addr = match self {
            Socks5Reply::Succeeded(addr) => *addr,
            _ => SocketAddr::from(([0, 0, 0, 0], 0)),
        };
        let mut buf = BytesMut::with_capacity(24);
        buf.put_slice(&[VERSION, self.code(), 0x00]);
        put_socket_addr(&mut buf, bind_addr);
        clt_w.write_all(&buf).await?;
        clt_w.flush().await
    }
}
