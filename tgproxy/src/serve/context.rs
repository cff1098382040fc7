/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use slog::Logger;
use tokio_rustls::TlsConnector;

use super::StreamTransit;
use crate::auth::Authorizer;
use crate::config::{ProxyConfig, TimeoutConfig};

/// Shared by all tasks of a server
pub(crate) struct ServerContext {
    pub(crate) authorizer: Arc<Authorizer>,
    pub(crate) connect_default_port: u16,
    pub(crate) max_header_size: usize,
    pub(crate) timeout: TimeoutConfig,
    pub(crate) tls_client: TlsConnector,
    pub(crate) task_logger: Logger,
}

impl ServerContext {
    pub(crate) fn new(
        config: &ProxyConfig,
        authorizer: Arc<Authorizer>,
        tls_client: TlsConnector,
        server_type: &'static str,
    ) -> Self {
        ServerContext {
            authorizer,
            connect_default_port: config.connect_default_port,
            max_header_size: config.max_header_size,
            timeout: config.timeout,
            tls_client,
            task_logger: crate::log::task::get_logger(server_type),
        }
    }

    pub(crate) fn stream_transit(&self) -> StreamTransit {
        StreamTransit::new(&self.timeout)
    }
}

#[cfg(test)]
impl ServerContext {
    pub(crate) fn for_test(authorizer: Arc<Authorizer>) -> Self {
        let config = ProxyConfig::default();
        ServerContext::new(
            &config,
            authorizer,
            super::tls::build_tls_connector(),
            "TestProxy",
        )
    }
}
