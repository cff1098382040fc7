/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{SocksAuthMethod, SocksNegotiationError, SocksRequestParseError, VERSION};

/// Read the method list sent by the client, the version byte should already have been consumed
pub async fn recv_methods_from_client<R>(
    clt_r: &mut R,
) -> Result<Vec<SocksAuthMethod>, SocksRequestParseError>
where
    R: AsyncRead + Unpin,
{
    let mut methods = match clt_r.read_u8().await? {
        0 => return Err(SocksNegotiationError::NoAuthMethod.into()),
        n => vec![0u8; usize::from(n)],
    };
    clt_r.read_exact(&mut methods).await?;
    Ok(methods.into_iter().map(SocksAuthMethod::from).collect())
}

/// Send the selected method, which is `NO_ACCEPTABLE` if none is supported
pub async fn send_method_to_client<W>(clt_w: &mut W, method: SocksAuthMethod) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    clt_w.write_all(&[VERSION, method.code()]).await?;
    clt_w.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn recv_methods() {
        let mut stream = Builder::new().read(&[0x02, 0x00, 0x02]).build();
        let methods = recv_methods_from_client(&mut stream).await.unwrap();
        assert_eq!(methods, vec![SocksAuthMethod::NONE, SocksAuthMethod::USER]);
    }

    #[tokio::test]
    async fn recv_no_method() {
        let mut stream = Builder::new().read(&[0x00]).build();
        let r = recv_methods_from_client(&mut stream).await;
        assert!(matches!(
            r,
            Err(SocksRequestParseError::InvalidProtocol(
                SocksNegotiationError::NoAuthMethod
            ))
        ));
    }

    #[tokio::test]
    async fn recv_truncated() {
        let mut stream = Builder::new().read(&[0x03, 0x00]).build();
        let r = recv_methods_from_client(&mut stream).await;
        assert!(matches!(r, Err(SocksRequestParseError::ClientClosed)));
    }

    #[tokio::test]
    async fn send_method() {
        let mut stream = Builder::new().write(&[0x05, 0xFF]).build();
        send_method_to_client(&mut stream, SocksAuthMethod::NO_ACCEPTABLE)
            .await
            .unwrap();
    }
}
