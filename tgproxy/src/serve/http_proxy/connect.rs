/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use tg_http::server::HttpProxyClientRequest;
use tg_types::net::UpstreamAddr;

use super::response::HttpProxyLocalResponse;
use crate::log::task::{TaskLog, TaskType};
use crate::serve::{
    ServerContext, ServerTaskError, ServerTaskNotes, ServerTaskResult, TransitBytes,
    tcp_connect_to,
};

/// Opaque tunnel set up by a CONNECT request
pub(super) struct HttpProxyConnectTask<'a> {
    ctx: &'a ServerContext,
    task_notes: &'a mut ServerTaskNotes,
    req: &'a HttpProxyClientRequest,
    upstream: Option<UpstreamAddr>,
    bytes: TransitBytes,
}

impl<'a> HttpProxyConnectTask<'a> {
    pub(super) fn new(
        ctx: &'a ServerContext,
        task_notes: &'a mut ServerTaskNotes,
        req: &'a HttpProxyClientRequest,
    ) -> Self {
        HttpProxyConnectTask {
            ctx,
            task_notes,
            req,
            upstream: None,
            bytes: TransitBytes::default(),
        }
    }

    fn get_log_context(&self) -> TaskLog<'_> {
        TaskLog {
            logger: &self.ctx.task_logger,
            task_type: TaskType::HttpConnect,
            task_notes: self.task_notes,
            upstream: self.upstream.as_ref(),
            client_rd_bytes: self.bytes.clt_read,
            client_wr_bytes: self.bytes.clt_write,
            remote_rd_bytes: self.bytes.ups_read,
            remote_wr_bytes: self.bytes.ups_write,
        }
    }

    pub(super) async fn run<CR, CW>(mut self, clt_r: &mut CR, clt_w: &mut CW)
    where
        CR: AsyncRead + Unpin,
        CW: AsyncWrite + Unpin,
    {
        self.bytes.clt_read += self.req.origin_header_size() as u64;
        let e = match self.run_connect(clt_r, clt_w).await {
            Ok(_) => ServerTaskError::Finished,
            Err(e) => e,
        };
        self.get_log_context().log(&e);
    }

    async fn run_connect<CR, CW>(&mut self, clt_r: &mut CR, clt_w: &mut CW) -> ServerTaskResult<()>
    where
        CR: AsyncRead + Unpin,
        CW: AsyncWrite + Unpin,
    {
        let upstream = self.req.connect_target(self.ctx.connect_default_port)?;
        self.upstream = Some(upstream.clone());

        let client_ip = self.task_notes.client_ip();
        let auth = self.req.proxy_authorization.as_ref();
        let Some(user) = self.ctx.authorizer.authorize(auth, client_ip) else {
            self.bytes.clt_write += HttpProxyLocalResponse::ConnectAuthRequired
                .send(clt_w)
                .await
                .map_err(ServerTaskError::ClientTcpWriteFailed)?;
            return Err(ServerTaskError::ClientAuthFailed);
        };
        self.task_notes.set_user(user);

        let ups_stream = tcp_connect_to(&upstream, self.ctx.timeout.connect).await?;

        self.bytes.clt_write += HttpProxyLocalResponse::ConnectionEstablished
            .send(clt_w)
            .await
            .map_err(ServerTaskError::ClientTcpWriteFailed)?;

        let (mut ups_r, mut ups_w) = ups_stream.into_split();
        self.ctx
            .stream_transit()
            .transit(clt_r, clt_w, &mut ups_r, &mut ups_w, &mut self.bytes)
            .await
    }
}
