/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use http::Method;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use tg_http::client::HttpForwardRemoteResponse;
use tg_http::server::HttpProxyClientRequest;
use tg_http::{HttpBodyTransferError, HttpBodyType, transfer_body};
use tg_types::net::UpstreamAddr;

use super::response::HttpProxyLocalResponse;
use crate::log::task::{TaskLog, TaskType};
use crate::serve::tls::tls_server_name;
use crate::serve::{
    ServerContext, ServerTaskError, ServerTaskNotes, ServerTaskResult, TransitBytes,
    tcp_connect_to,
};

const MAX_CHUNK_LINE_SIZE: usize = 8192;

fn send_body_error(e: HttpBodyTransferError) -> ServerTaskError {
    match e {
        HttpBodyTransferError::ReadFailed(e) => ServerTaskError::ClientTcpReadFailed(e),
        HttpBodyTransferError::WriteFailed(e) => ServerTaskError::UpstreamWriteFailed(e),
        HttpBodyTransferError::ReaderClosed => ServerTaskError::ClosedByClient,
        HttpBodyTransferError::ChunkLineTooLong | HttpBodyTransferError::InvalidChunkLine(_) => {
            ServerTaskError::InvalidClientProtocol("invalid chunked request body")
        }
    }
}

fn recv_body_error(e: HttpBodyTransferError) -> ServerTaskError {
    match e {
        HttpBodyTransferError::ReadFailed(e) => ServerTaskError::UpstreamReadFailed(e),
        HttpBodyTransferError::WriteFailed(e) => ServerTaskError::ClientTcpWriteFailed(e),
        HttpBodyTransferError::ReaderClosed => ServerTaskError::ClosedByUpstream,
        e @ (HttpBodyTransferError::ChunkLineTooLong
        | HttpBodyTransferError::InvalidChunkLine(_)) => {
            ServerTaskError::InvalidUpstreamProtocol(e.to_string())
        }
    }
}

/// Errors caused by the origin side, which are reported to the client as `502`
fn is_upstream_failure(e: &ServerTaskError) -> bool {
    matches!(
        e,
        ServerTaskError::UpstreamNotConnected(_)
            | ServerTaskError::UpstreamTlsHandshakeFailed(_)
            | ServerTaskError::InvalidUpstreamProtocol(_)
            | ServerTaskError::UpstreamReadFailed(_)
            | ServerTaskError::UpstreamWriteFailed(_)
            | ServerTaskError::ClosedByUpstream
    )
}

/// Receive the final response head, relaying all interim `1xx` ones to the client
async fn recv_final_head<UR, CW>(
    ups_r: &mut UR,
    clt_w: &mut CW,
    method: &Method,
    max_header_size: usize,
    bytes: &mut TransitBytes,
    rsp_started: &mut bool,
) -> ServerTaskResult<HttpForwardRemoteResponse>
where
    UR: AsyncBufRead + Unpin,
    CW: AsyncWrite + Unpin,
{
    loop {
        let rsp = HttpForwardRemoteResponse::parse(ups_r, method, max_header_size).await?;
        bytes.ups_read += rsp.head().len() as u64;
        if !rsp.is_informational() {
            return Ok(rsp);
        }

        *rsp_started = true;
        clt_w
            .write_all(rsp.head())
            .await
            .map_err(ServerTaskError::ClientTcpWriteFailed)?;
        clt_w
            .flush()
            .await
            .map_err(ServerTaskError::ClientTcpWriteFailed)?;
        bytes.clt_write += rsp.head().len() as u64;
    }
}

/// A single request forwarded to its origin server
pub(super) struct HttpProxyForwardTask<'a> {
    ctx: &'a ServerContext,
    task_notes: &'a mut ServerTaskNotes,
    req: &'a HttpProxyClientRequest,
    upstream: Option<UpstreamAddr>,
    bytes: TransitBytes,
    rsp_started: bool,
    keep_alive: bool,
}

impl<'a> HttpProxyForwardTask<'a> {
    pub(super) fn new(
        ctx: &'a ServerContext,
        task_notes: &'a mut ServerTaskNotes,
        req: &'a HttpProxyClientRequest,
    ) -> Self {
        HttpProxyForwardTask {
            ctx,
            task_notes,
            req,
            upstream: None,
            bytes: TransitBytes::default(),
            rsp_started: false,
            keep_alive: false,
        }
    }

    fn get_log_context(&self) -> TaskLog<'_> {
        TaskLog {
            logger: &self.ctx.task_logger,
            task_type: TaskType::HttpForward,
            task_notes: self.task_notes,
            upstream: self.upstream.as_ref(),
            client_rd_bytes: self.bytes.clt_read,
            client_wr_bytes: self.bytes.clt_write,
            remote_rd_bytes: self.bytes.ups_read,
            remote_wr_bytes: self.bytes.ups_write,
        }
    }

    /// Returns whether the client connection can be used for the next request
    pub(super) async fn run<CR, CW>(mut self, clt_r: &mut CR, clt_w: &mut CW) -> bool
    where
        CR: AsyncBufRead + Unpin,
        CW: AsyncWrite + Unpin,
    {
        self.bytes.clt_read += self.req.origin_header_size() as u64;
        let e = match self.run_forward(clt_r, clt_w).await {
            Ok(_) => ServerTaskError::Finished,
            Err(e) => {
                if !self.rsp_started && is_upstream_failure(&e) {
                    let reason = e.to_string();
                    if let Ok(nw) = (HttpProxyLocalResponse::BadGateway { reason: &reason })
                        .send(clt_w)
                        .await
                    {
                        self.bytes.clt_write += nw;
                    }
                }
                e
            }
        };
        self.get_log_context().log(&e);
        self.keep_alive
    }

    async fn run_forward<CR, CW>(&mut self, clt_r: &mut CR, clt_w: &mut CW) -> ServerTaskResult<()>
    where
        CR: AsyncBufRead + Unpin,
        CW: AsyncWrite + Unpin,
    {
        let (upstream, tls) = self.req.forward_target()?;
        self.upstream = Some(upstream.clone());

        let client_ip = self.task_notes.client_ip();
        let auth = self.req.proxy_authorization.as_ref();
        let Some(user) = self.ctx.authorizer.authorize(auth, client_ip) else {
            // the unread request body would be taken as the next request
            let keep_alive = self.req.body_type().is_none() && self.req.keep_alive();
            self.rsp_started = true;
            self.bytes.clt_write += HttpProxyLocalResponse::AuthRequired { close: !keep_alive }
                .send(clt_w)
                .await
                .map_err(ServerTaskError::ClientTcpWriteFailed)?;
            self.keep_alive = keep_alive;
            return Err(ServerTaskError::ClientAuthFailed);
        };
        self.task_notes.set_user(user);

        let ups_stream = tcp_connect_to(&upstream, self.ctx.timeout.connect).await?;
        if !tls {
            return self
                .forward_via(&upstream, false, clt_r, clt_w, ups_stream)
                .await;
        }

        let server_name = tls_server_name(&upstream)
            .map_err(|e| ServerTaskError::MalformedTarget(e.to_string()))?;
        let tls_connect = self.ctx.tls_client.connect(server_name, ups_stream);
        let tls_stream = match tokio::time::timeout(self.ctx.timeout.connect, tls_connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ServerTaskError::UpstreamTlsHandshakeFailed(e)),
            Err(_) => {
                return Err(ServerTaskError::UpstreamTlsHandshakeFailed(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "tls handshake timed out",
                )));
            }
        };
        self.forward_via(&upstream, true, clt_r, clt_w, tls_stream)
            .await
    }

    async fn forward_via<CR, CW, S>(
        &mut self,
        upstream: &UpstreamAddr,
        tls: bool,
        clt_r: &mut CR,
        clt_w: &mut CW,
        ups_stream: S,
    ) -> ServerTaskResult<()>
    where
        CR: AsyncBufRead + Unpin,
        CW: AsyncWrite + Unpin,
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let req = self.req;
        let (ups_r, mut ups_w) = tokio::io::split(ups_stream);
        let mut ups_r = BufReader::new(ups_r);

        let head = req.serialize_for_origin(upstream, tls);
        ups_w
            .write_all(&head)
            .await
            .map_err(ServerTaskError::UpstreamWriteFailed)?;
        ups_w
            .flush()
            .await
            .map_err(ServerTaskError::UpstreamWriteFailed)?;
        self.bytes.ups_write += head.len() as u64;

        let mut body_sent = req.body_type().is_none();
        let rsp = match req.body_type() {
            Some(body_type) => {
                let mut body_size = 0u64;
                let r = {
                    let send_body =
                        transfer_body(clt_r, &mut ups_w, body_type, MAX_CHUNK_LINE_SIZE);
                    tokio::pin!(send_body);
                    let recv_head = recv_final_head(
                        &mut ups_r,
                        clt_w,
                        &req.method,
                        self.ctx.max_header_size,
                        &mut self.bytes,
                        &mut self.rsp_started,
                    );
                    tokio::pin!(recv_head);

                    loop {
                        tokio::select! {
                            biased;

                            r = &mut recv_head => break r,
                            r = &mut send_body, if !body_sent => {
                                match r {
                                    Ok(nw) => {
                                        body_size = nw;
                                        body_sent = true;
                                    }
                                    Err(e) => break Err(send_body_error(e)),
                                }
                            }
                        }
                    }
                };
                self.bytes.clt_read += body_size;
                self.bytes.ups_write += body_size;
                r?
            }
            None => {
                recv_final_head(
                    &mut ups_r,
                    clt_w,
                    &req.method,
                    self.ctx.max_header_size,
                    &mut self.bytes,
                    &mut self.rsp_started,
                )
                .await?
            }
        };

        self.rsp_started = true;
        clt_w
            .write_all(rsp.head())
            .await
            .map_err(ServerTaskError::ClientTcpWriteFailed)?;
        self.bytes.clt_write += rsp.head().len() as u64;

        if rsp.is_switching_protocols() {
            clt_w
                .flush()
                .await
                .map_err(ServerTaskError::ClientTcpWriteFailed)?;
            return self
                .ctx
                .stream_transit()
                .transit(clt_r, clt_w, &mut ups_r, &mut ups_w, &mut self.bytes)
                .await;
        }

        let mut read_until_end = false;
        match rsp.body_type(&req.method) {
            Some(body_type) => {
                read_until_end = body_type == HttpBodyType::ReadUntilEnd;
                let nw = transfer_body(&mut ups_r, clt_w, body_type, MAX_CHUNK_LINE_SIZE)
                    .await
                    .map_err(recv_body_error)?;
                self.bytes.ups_read += nw;
                self.bytes.clt_write += nw;
            }
            None => {
                clt_w
                    .flush()
                    .await
                    .map_err(ServerTaskError::ClientTcpWriteFailed)?;
            }
        }

        self.keep_alive = body_sent && req.keep_alive() && rsp.keep_alive() && !read_until_end;
        Ok(())
    }
}
