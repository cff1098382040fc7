/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use tokio::io::{AsyncRead, AsyncReadExt};

use tg_types::net::UpstreamAddr;

use super::addr::read_upstream;
use super::{SocksCommand, SocksNegotiationError, SocksRequestParseError, VERSION};

/// `VER CMD RSV ATYP DST.ADDR DST.PORT` sent after method negotiation
pub struct Socks5Request {
    pub command: SocksCommand,
    pub upstream: UpstreamAddr,
}

impl Socks5Request {
    pub async fn recv<R>(clt_r: &mut R) -> Result<Self, SocksRequestParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut hdr = [0u8; 2];
        clt_r.read_exact(&mut hdr).await?;
        let [version, cmd] = hdr;
        if version != VERSION {
            return Err(SocksNegotiationError::InvalidVersion.into());
        }
        let command = SocksCommand::try_from(cmd)?;
        let _reserved = clt_r.read_u8().await?;

        let upstream = read_upstream(clt_r).await?;
        Ok(Socks5Request { command, upstream })
    }
}
