/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;

use tg_socks::v5::{self, Socks5Reply, Socks5Request};
use tg_socks::{SocksAuthMethod, SocksCommand, SocksNegotiationError, SocksRequestParseError};
use tg_types::net::UpstreamAddr;

use crate::log::task::{TaskLog, TaskType};
use crate::serve::{
    ServerContext, ServerTaskError, ServerTaskNotes, ServerTaskResult, TcpConnectError,
    TransitBytes, tcp_connect_to,
};

fn connect_error_reply(e: &TcpConnectError) -> Socks5Reply {
    match e {
        TcpConnectError::ResolveFailed(_) | TcpConnectError::NoAddressResolved => {
            Socks5Reply::HostUnreachable
        }
        TcpConnectError::TimeoutByRule => Socks5Reply::TtlExpired,
        TcpConnectError::ConnectFailed(e) => Socks5Reply::from_connect_error(e),
    }
}

pub(super) struct SocksProxyTask {
    ctx: Arc<ServerContext>,
    task_notes: ServerTaskNotes,
    upstream: Option<UpstreamAddr>,
    bytes: TransitBytes,
}

impl SocksProxyTask {
    pub(super) fn new(ctx: Arc<ServerContext>, task_notes: ServerTaskNotes) -> Self {
        SocksProxyTask {
            ctx,
            task_notes,
            upstream: None,
            bytes: TransitBytes::default(),
        }
    }

    fn get_log_context(&self) -> TaskLog<'_> {
        TaskLog {
            logger: &self.ctx.task_logger,
            task_type: TaskType::SocksConnect,
            task_notes: &self.task_notes,
            upstream: self.upstream.as_ref(),
            client_rd_bytes: self.bytes.clt_read,
            client_wr_bytes: self.bytes.clt_write,
            remote_rd_bytes: self.bytes.ups_read,
            remote_wr_bytes: self.bytes.ups_write,
        }
    }

    pub(super) async fn run(mut self, stream: TcpStream) {
        let (mut clt_r, mut clt_w) = stream.into_split();
        let e = match self.run_socks(&mut clt_r, &mut clt_w).await {
            Ok(_) => ServerTaskError::Finished,
            Err(e) => e,
        };
        self.get_log_context().log(&e);
    }

    async fn run_socks<CR, CW>(&mut self, clt_r: &mut CR, clt_w: &mut CW) -> ServerTaskResult<()>
    where
        CR: AsyncRead + Unpin,
        CW: AsyncWrite + Unpin,
    {
        let timeout = self.ctx.timeout.negotiation;
        let req = match tokio::time::timeout(timeout, negotiate(clt_r, clt_w)).await {
            Ok(r) => r?,
            Err(_) => return Err(ServerTaskError::ClientAppTimeout("negotiation timeout")),
        };
        self.upstream = Some(req.upstream.clone());

        let client_ip = self.task_notes.client_ip();
        let Some(user) = self.ctx.authorizer.authorize_by_source(client_ip) else {
            let _ = Socks5Reply::ForbiddenByRule.send(clt_w).await;
            return Err(ServerTaskError::ClientAuthFailed);
        };
        self.task_notes.set_user(user);

        if req.command != SocksCommand::TcpConnect {
            let _ = Socks5Reply::CommandNotSupported.send(clt_w).await;
            return Err(ServerTaskError::UnimplementedProtocol);
        }

        let ups_stream = match tcp_connect_to(&req.upstream, self.ctx.timeout.connect).await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = connect_error_reply(&e).send(clt_w).await;
                return Err(e.into());
            }
        };
        let Ok(bind_addr) = ups_stream.local_addr() else {
            let _ = Socks5Reply::GeneralServerFailure.send(clt_w).await;
            return Err(ServerTaskError::InternalServerError(
                "failed to get local address of upstream connection",
            ));
        };
        Socks5Reply::Succeeded(bind_addr)
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

/// Run the method selection and receive the request, only method `None` is accepted
async fn negotiate<CR, CW>(clt_r: &mut CR, clt_w: &mut CW) -> ServerTaskResult<Socks5Request>
where
    CR: AsyncRead + Unpin,
    CW: AsyncWrite + Unpin,
{
    let version = clt_r
        .read_u8()
        .await
        .map_err(ServerTaskError::ClientTcpReadFailed)?;
    if version != v5::VERSION {
        return Err(ServerTaskError::InvalidClientProtocol(
            "invalid socks version",
        ));
    }

    let client_methods = v5::auth::recv_methods_from_client(clt_r).await?;
    if !client_methods.contains(&SocksAuthMethod::NONE) {
        let _ = v5::auth::send_method_to_client(clt_w, SocksAuthMethod::NO_ACCEPTABLE).await;
        return Err(ServerTaskError::ClientAuthFailed);
    }
    v5::auth::send_method_to_client(clt_w, SocksAuthMethod::NONE)
        .await
        .map_err(ServerTaskError::ClientTcpWriteFailed)?;

    match Socks5Request::recv(clt_r).await {
        Ok(req) => Ok(req),
        Err(SocksRequestParseError::InvalidProtocol(e)) => {
            let reply = match e {
                SocksNegotiationError::InvalidCommand => Socks5Reply::CommandNotSupported,
                SocksNegotiationError::InvalidAddrType => Socks5Reply::AddressTypeNotSupported,
                _ => Socks5Reply::GeneralServerFailure,
            };
            let _ = reply.send(clt_w).await;
            Err(SocksRequestParseError::InvalidProtocol(e).into())
        }
        Err(e) => Err(e.into()),
    }
}
