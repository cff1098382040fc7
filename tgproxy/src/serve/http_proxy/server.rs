/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use super::task::HttpProxyTask;
use crate::serve::{AcceptTcpServer, ServerContext, ServerTaskNotes};

pub(crate) const SERVER_TYPE_HTTP: &str = "HttpProxy";
pub(crate) const SERVER_TYPE_HTTPS: &str = "HttpsProxy";

/// Forward proxy for http requests and CONNECT tunnels, optionally behind tls
pub(crate) struct HttpProxyServer {
    ctx: Arc<ServerContext>,
    tls_acceptor: Option<TlsAcceptor>,
}

impl HttpProxyServer {
    pub(crate) fn new(ctx: ServerContext) -> Self {
        HttpProxyServer {
            ctx: Arc::new(ctx),
            tls_acceptor: None,
        }
    }

    pub(crate) fn with_tls(ctx: ServerContext, tls_acceptor: TlsAcceptor) -> Self {
        HttpProxyServer {
            ctx: Arc::new(ctx),
            tls_acceptor: Some(tls_acceptor),
        }
    }
}

#[async_trait]
impl AcceptTcpServer for HttpProxyServer {
    fn server_type(&self) -> &'static str {
        if self.tls_acceptor.is_some() {
            SERVER_TYPE_HTTPS
        } else {
            SERVER_TYPE_HTTP
        }
    }

    async fn run_tcp_task(&self, stream: TcpStream, task_notes: ServerTaskNotes) {
        let Some(tls_acceptor) = &self.tls_acceptor else {
            HttpProxyTask::new(self.ctx.clone(), task_notes)
                .run(stream)
                .await;
            return;
        };

        let client_addr = task_notes.client_addr;
        let tls_accept = tls_acceptor.accept(stream);
        match tokio::time::timeout(self.ctx.timeout.tls_accept, tls_accept).await {
            Ok(Ok(tls_stream)) => {
                HttpProxyTask::new(self.ctx.clone(), task_notes)
                    .run(tls_stream)
                    .await
            }
            Ok(Err(e)) => debug!("tls handshake with client {client_addr} failed: {e}"),
            Err(_) => debug!("tls handshake with client {client_addr} timed out"),
        }
    }
}
