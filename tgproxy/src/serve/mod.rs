/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::{Authorizer, CredentialStore, TrustCache};
use crate::config::ProxyConfig;
use crate::store::{PersistenceHandle, PersistenceLoop};

mod error;
pub(crate) use error::{ServerTaskError, ServerTaskResult};

mod task;
pub(crate) use task::ServerTaskNotes;

mod connect;
pub(crate) use connect::{TcpConnectError, tcp_connect_to};

mod transit;
pub(crate) use transit::{StreamTransit, TransitBytes};

mod context;
pub(crate) use context::ServerContext;

mod listen;
pub(crate) use listen::{AcceptTcpServer, ListenTcpRuntime};

mod tls;

mod http_proxy;
use http_proxy::HttpProxyServer;

mod socks_proxy;
use socks_proxy::SocksProxyServer;

/// All listeners of the process together with the trust store persistence
pub struct ProxyDaemon {
    quit_sender: watch::Sender<bool>,
    servers: Vec<JoinHandle<()>>,
    persistence: PersistenceHandle,
}

impl ProxyDaemon {
    pub async fn start(config: ProxyConfig) -> anyhow::Result<Self> {
        let trust_cache = Arc::new(TrustCache::new());
        crate::store::restore_from_file(&trust_cache, &config.store.path);

        let credentials = CredentialStore::new(&config.users);
        if credentials.is_empty() {
            warn!("no user configured, only restored client addresses will be trusted");
        }
        let authorizer = Arc::new(Authorizer::new(credentials, trust_cache.clone()));
        let tls_client = tls::build_tls_connector();
        let new_ctx = |server_type: &'static str| {
            ServerContext::new(&config, authorizer.clone(), tls_client.clone(), server_type)
        };

        let http_runtime = match config.http_port {
            Some(port) => {
                let server = HttpProxyServer::new(new_ctx(http_proxy::SERVER_TYPE_HTTP));
                let addr = SocketAddr::new(config.listen_ip, port);
                Some(ListenTcpRuntime::bind(server, addr).await?)
            }
            None => None,
        };
        let https_runtime = match config.https_port {
            Some(port) => {
                let Some(tls_config) = &config.tls else {
                    return Err(anyhow!("tls config is needed by the https server"));
                };
                let tls_acceptor = tls::build_tls_acceptor(tls_config)?;
                let ctx = new_ctx(http_proxy::SERVER_TYPE_HTTPS);
                let server = HttpProxyServer::with_tls(ctx, tls_acceptor);
                let addr = SocketAddr::new(config.listen_ip, port);
                Some(ListenTcpRuntime::bind(server, addr).await?)
            }
            None => None,
        };
        let socks_runtime = match config.socks_port {
            Some(port) => {
                let server = SocksProxyServer::new(new_ctx(socks_proxy::SERVER_TYPE_SOCKS));
                let addr = SocketAddr::new(config.listen_ip, port);
                Some(ListenTcpRuntime::bind(server, addr).await?)
            }
            None => None,
        };

        let (quit_sender, _) = watch::channel(false);
        let mut servers = Vec::with_capacity(3);
        if let Some(runtime) = http_runtime {
            servers.push(tokio::spawn(runtime.run(quit_sender.subscribe())));
        }
        if let Some(runtime) = https_runtime {
            servers.push(tokio::spawn(runtime.run(quit_sender.subscribe())));
        }
        if let Some(runtime) = socks_runtime {
            servers.push(tokio::spawn(runtime.run(quit_sender.subscribe())));
        }

        let persistence = PersistenceLoop::new(
            trust_cache,
            config.store.path.clone(),
            config.store.flush_interval,
        )
        .spawn();

        Ok(ProxyDaemon {
            quit_sender,
            servers,
            persistence,
        })
    }

    /// Stop accepting new connections once quit is signaled, then write out the trust store
    pub async fn run_until_quit(self, mut quit_receiver: watch::Receiver<bool>) {
        let _ = quit_receiver.wait_for(|quit| *quit).await;
        info!("quit signal received");

        self.quit_sender.send_replace(true);
        for server in self.servers {
            let _ = server.await;
        }
        self.persistence.stop().await;
    }
}
