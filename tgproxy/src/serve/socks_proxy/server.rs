/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;

use super::task::SocksProxyTask;
use crate::serve::{AcceptTcpServer, ServerContext, ServerTaskNotes};

pub(crate) const SERVER_TYPE_SOCKS: &str = "SocksProxy";

/// Socks5 proxy for clients already trusted by their source address
pub(crate) struct SocksProxyServer {
    ctx: Arc<ServerContext>,
}

impl SocksProxyServer {
    pub(crate) fn new(ctx: ServerContext) -> Self {
        SocksProxyServer { ctx: Arc::new(ctx) }
    }
}

#[async_trait]
impl AcceptTcpServer for SocksProxyServer {
    fn server_type(&self) -> &'static str {
        SERVER_TYPE_SOCKS
    }

    async fn run_tcp_task(&self, stream: TcpStream, task_notes: ServerTaskNotes) {
        SocksProxyTask::new(self.ctx.clone(), task_notes)
            .run(stream)
            .await
    }
}
