/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use tg_http::server::{HttpProxyClientRequest, HttpRequestParseError};

use super::connect::HttpProxyConnectTask;
use super::forward::HttpProxyForwardTask;
use crate::serve::{ServerContext, ServerTaskNotes};

/// Serve all requests on a single client connection
pub(super) struct HttpProxyTask {
    ctx: Arc<ServerContext>,
    task_notes: ServerTaskNotes,
}

impl HttpProxyTask {
    pub(super) fn new(ctx: Arc<ServerContext>, task_notes: ServerTaskNotes) -> Self {
        HttpProxyTask { ctx, task_notes }
    }

    pub(super) async fn run<S>(mut self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (clt_r, mut clt_w) = tokio::io::split(stream);
        let mut clt_r = BufReader::new(clt_r);

        loop {
            let req = match HttpProxyClientRequest::parse(&mut clt_r, self.ctx.max_header_size)
                .await
            {
                Ok(req) => req,
                Err(HttpRequestParseError::ClientClosed) => break,
                Err(e) => {
                    debug!("invalid request from {}: {e}", self.task_notes.client_addr);
                    break;
                }
            };

            if req.is_connect() {
                HttpProxyConnectTask::new(&self.ctx, &mut self.task_notes, &req)
                    .run(&mut clt_r, &mut clt_w)
                    .await;
                break;
            }

            let keep_alive = HttpProxyForwardTask::new(&self.ctx, &mut self.task_notes, &req)
                .run(&mut clt_r, &mut clt_w)
                .await;
            if !keep_alive {
                break;
            }
            self.task_notes.renew();
        }

        let _ = clt_w.shutdown().await;
    }
}
