/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use tg_io_ext::{IdleInterval, StreamCopy, StreamCopyConfig, StreamCopyError};

use super::{ServerTaskError, ServerTaskResult};
use crate::config::TimeoutConfig;

#[derive(Default)]
pub(crate) struct TransitBytes {
    pub(crate) clt_read: u64,
    pub(crate) clt_write: u64,
    pub(crate) ups_read: u64,
    pub(crate) ups_write: u64,
}

/// Relay bytes in both directions until one of them ends
///
/// Once a direction ends or fails, the writers of both sides are shut down, so the
/// connections will be closed together when dropped by the caller.
pub(crate) struct StreamTransit {
    copy_config: StreamCopyConfig,
    idle_check: Duration,
    max_idle_count: usize,
}

impl StreamTransit {
    pub(crate) fn new(timeout: &TimeoutConfig) -> Self {
        StreamTransit {
            copy_config: StreamCopyConfig::default(),
            idle_check: timeout.idle_check,
            max_idle_count: timeout.max_idle_count,
        }
    }

    pub(crate) async fn transit<CR, CW, UR, UW>(
        &self,
        clt_r: &mut CR,
        clt_w: &mut CW,
        ups_r: &mut UR,
        ups_w: &mut UW,
        bytes: &mut TransitBytes,
    ) -> ServerTaskResult<()>
    where
        CR: AsyncRead + Unpin,
        CW: AsyncWrite + Unpin,
        UR: AsyncRead + Unpin,
        UW: AsyncWrite + Unpin,
    {
        let mut clt_to_ups = StreamCopy::new(clt_r, ups_w, &self.copy_config);
        let mut ups_to_clt = StreamCopy::new(ups_r, clt_w, &self.copy_config);

        let mut idle_interval = IdleInterval::new(self.idle_check);
        let mut idle_count = 0;
        let r = loop {
            tokio::select! {
                r = &mut clt_to_ups => {
                    break match r {
                        Ok(_) => {
                            let _ = ups_to_clt.write_flush().await;
                            Err(ServerTaskError::ClosedByClient)
                        }
                        Err(StreamCopyError::ReadFailed(e)) => {
                            let _ = ups_to_clt.write_flush().await;
                            Err(ServerTaskError::ClientTcpReadFailed(e))
                        }
                        Err(StreamCopyError::WriteFailed(e)) => {
                            let _ = ups_to_clt.write_flush().await;
                            Err(ServerTaskError::UpstreamWriteFailed(e))
                        }
                    };
                }
                r = &mut ups_to_clt => {
                    break match r {
                        Ok(_) => {
                            let _ = clt_to_ups.write_flush().await;
                            Err(ServerTaskError::ClosedByUpstream)
                        }
                        Err(StreamCopyError::ReadFailed(e)) => {
                            let _ = clt_to_ups.write_flush().await;
                            Err(ServerTaskError::UpstreamReadFailed(e))
                        }
                        Err(StreamCopyError::WriteFailed(e)) => {
                            let _ = clt_to_ups.write_flush().await;
                            Err(ServerTaskError::ClientTcpWriteFailed(e))
                        }
                    };
                }
                n = idle_interval.tick() => {
                    if clt_to_ups.is_idle() && ups_to_clt.is_idle() {
                        idle_count += n;
                        if self.max_idle_count > 0 && idle_count >= self.max_idle_count {
                            break Err(ServerTaskError::Idle(idle_interval.period(), idle_count));
                        }
                    } else {
                        idle_count = 0;

                        clt_to_ups.reset_active();
                        ups_to_clt.reset_active();
                    }
                }
            }
        };

        let _ = clt_to_ups.writer().shutdown().await;
        let _ = ups_to_clt.writer().shutdown().await;

        bytes.clt_read += clt_to_ups.read_size();
        bytes.ups_write += clt_to_ups.copied_size();
        bytes.ups_read += ups_to_clt.read_size();
        bytes.clt_write += ups_to_clt.copied_size();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, split};

    fn transit() -> StreamTransit {
        StreamTransit::new(&TimeoutConfig::default())
    }

    #[tokio::test]
    async fn relay_until_client_close() {
        let (clt, mut clt_peer) = tokio::io::duplex(1024);
        let (ups, mut ups_peer) = tokio::io::duplex(1024);
        let (mut clt_r, mut clt_w) = split(clt);
        let (mut ups_r, mut ups_w) = split(ups);

        let relay = tokio::spawn(async move {
            let mut bytes = TransitBytes::default();
            let r = transit()
                .transit(&mut clt_r, &mut clt_w, &mut ups_r, &mut ups_w, &mut bytes)
                .await;
            (r, bytes)
        });

        clt_peer.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        ups_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");

        ups_peer.write_all(b"pong!").await.unwrap();
        let mut buf = [0u8; 5];
        clt_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"pong!");

        clt_peer.shutdown().await.unwrap();
        let (r, bytes) = relay.await.unwrap();
        assert!(matches!(r, Err(ServerTaskError::ClosedByClient)));
        assert_eq!(bytes.clt_read, 4);
        assert_eq!(bytes.ups_write, 4);
        assert_eq!(bytes.ups_read, 5);
        assert_eq!(bytes.clt_write, 5);

        // both sides see the close
        let mut rest = Vec::new();
        assert_eq!(ups_peer.read_to_end(&mut rest).await.unwrap(), 0);
        assert_eq!(clt_peer.read_to_end(&mut rest).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn upstream_close_closes_client() {
        let (clt, mut clt_peer) = tokio::io::duplex(1024);
        let (ups, mut ups_peer) = tokio::io::duplex(1024);
        let (mut clt_r, mut clt_w) = split(clt);
        let (mut ups_r, mut ups_w) = split(ups);

        let relay = tokio::spawn(async move {
            let mut bytes = TransitBytes::default();
            transit()
                .transit(&mut clt_r, &mut clt_w, &mut ups_r, &mut ups_w, &mut bytes)
                .await
        });

        ups_peer.write_all(b"bye").await.unwrap();
        ups_peer.shutdown().await.unwrap();
        let r = relay.await.unwrap();
        assert!(matches!(r, Err(ServerTaskError::ClosedByUpstream)));

        let mut data = Vec::new();
        clt_peer.read_to_end(&mut data).await.unwrap();
        assert_eq!(data, b"bye");
    }

    #[tokio::test(start_paused = true)]
    async fn idle_close() {
        let (clt, _clt_peer) = tokio::io::duplex(1024);
        let (ups, _ups_peer) = tokio::io::duplex(1024);
        let (mut clt_r, mut clt_w) = split(clt);
        let (mut ups_r, mut ups_w) = split(ups);

        let timeout = TimeoutConfig {
            idle_check: Duration::from_secs(1),
            max_idle_count: 3,
            ..Default::default()
        };
        let mut bytes = TransitBytes::default();
        let r = StreamTransit::new(&timeout)
            .transit(&mut clt_r, &mut clt_w, &mut ups_r, &mut ups_w, &mut bytes)
            .await;
        assert!(matches!(r, Err(ServerTaskError::Idle(_, 3))));
    }
}
