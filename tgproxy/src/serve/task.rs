/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::time::Instant;

/// Notes bound to a single task on a client connection
pub(crate) struct ServerTaskNotes {
    pub(crate) client_addr: SocketAddr,
    pub(crate) server_addr: SocketAddr,
    user: Option<String>,
    create_ins: Instant,
}

impl ServerTaskNotes {
    pub(crate) fn new(client_addr: SocketAddr, server_addr: SocketAddr) -> Self {
        ServerTaskNotes {
            client_addr,
            server_addr,
            user: None,
            create_ins: Instant::now(),
        }
    }

    /// Reset for the next request on the same connection
    pub(crate) fn renew(&mut self) {
        self.user = None;
        self.create_ins = Instant::now();
    }

    #[inline]
    pub(crate) fn client_ip(&self) -> IpAddr {
        self.client_addr.ip()
    }

    pub(crate) fn set_user(&mut self, user: String) {
        self.user = Some(user);
    }

    pub(crate) fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub(crate) fn time_elapsed(&self) -> Duration {
        self.create_ins.elapsed()
    }
}
