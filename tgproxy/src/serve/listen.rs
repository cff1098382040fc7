/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use super::ServerTaskNotes;

#[async_trait]
pub(crate) trait AcceptTcpServer: Send + Sync + 'static {
    fn server_type(&self) -> &'static str;

    async fn run_tcp_task(&self, stream: TcpStream, task_notes: ServerTaskNotes);
}

/// Accept loop of a tcp listener, each connection is served in its own task
pub(crate) struct ListenTcpRuntime<S> {
    server: Arc<S>,
    listener: TcpListener,
}

impl<S: AcceptTcpServer> ListenTcpRuntime<S> {
    pub(crate) async fn bind(server: S, addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await.context(format!(
            "failed to listen on {addr} for {} server",
            server.server_type()
        ))?;
        Ok(ListenTcpRuntime {
            server: Arc::new(server),
            listener,
        })
    }

    pub(crate) fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub(crate) async fn run(self, mut quit_receiver: watch::Receiver<bool>) {
        let server_type = self.server.server_type();
        match self.listener.local_addr() {
            Ok(addr) => info!("{server_type} server started on {addr}"),
            Err(e) => warn!("{server_type} server started with unknown local address: {e}"),
        }

        loop {
            tokio::select! {
                biased;

                _ = quit_receiver.wait_for(|quit| *quit) => break,
                r = self.listener.accept() => {
                    match r {
                        Ok((stream, peer_addr)) => self.run_task(stream, peer_addr),
                        Err(e) => warn!("{server_type} server accept: {e:?}"),
                    }
                }
            }
        }
        info!("{server_type} server stopped");
    }

    fn run_task(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let local_addr = match stream.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("failed to get local address of connection from {peer_addr}: {e}");
                return;
            }
        };
        let _ = stream.set_nodelay(true);

        let server = self.server.clone();
        let task_notes = ServerTaskNotes::new(peer_addr, local_addr);
        tokio::spawn(async move {
            server.run_tcp_task(stream, task_notes).await;
        });
    }
}
