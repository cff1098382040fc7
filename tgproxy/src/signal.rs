/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use log::info;
use tokio::sync::watch;

#[cfg(unix)]
fn register_one(
    kind: tokio::signal::unix::SignalKind,
    name: &'static str,
    quit_sender: Arc<watch::Sender<bool>>,
) -> anyhow::Result<()> {
    use std::future::poll_fn;

    use anyhow::anyhow;
    use tokio::signal::unix::signal;

    let mut sig = signal(kind).map_err(|e| anyhow!("failed to create {name} listener: {e}"))?;
    tokio::spawn(async move {
        if poll_fn(|cx| sig.poll_recv(cx)).await.is_some() {
            info!("got {name} signal");
            let _ = quit_sender.send(true);
        }
    });
    Ok(())
}

/// Register SIGINT, SIGTERM and SIGQUIT, all of them trigger a graceful quit
#[cfg(unix)]
pub fn register(quit_sender: watch::Sender<bool>) -> anyhow::Result<()> {
    use tokio::signal::unix::SignalKind;

    let quit_sender = Arc::new(quit_sender);
    register_one(SignalKind::interrupt(), "SIGINT", quit_sender.clone())?;
    register_one(SignalKind::terminate(), "SIGTERM", quit_sender.clone())?;
    register_one(SignalKind::quit(), "SIGQUIT", quit_sender)
}

#[cfg(not(unix))]
pub fn register(quit_sender: watch::Sender<bool>) -> anyhow::Result<()> {
    let quit_sender = Arc::new(quit_sender);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("got ctrl-c signal");
            let _ = quit_sender.send(true);
        }
    });
    Ok(())
}
