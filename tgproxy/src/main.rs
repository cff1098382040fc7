/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use anyhow::Context;
use log::{debug, error, info};

use tgproxy::config::ProxyConfig;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "rustls-ring")]
    let _ = rustls::crypto::ring::default_provider().install_default();
    #[cfg(all(feature = "rustls-aws-lc", not(feature = "rustls-ring")))]
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let Some(proc_args) =
        tgproxy::opts::parse_clap().context("failed to parse command line options")?
    else {
        return Ok(());
    };

    // set up process logger early, only proc args is used inside
    let _log_guard =
        tgproxy::log::process::setup(&proc_args).context("failed to setup logger")?;

    let config = tgproxy::config::load(&proc_args)
        .context(format!("failed to load config, opts: {:?}", &proc_args))?;
    match &proc_args.config_file {
        Some(path) => debug!("loaded config from {}", path.display()),
        None => debug!("loaded config from environment"),
    }

    if proc_args.test_config {
        info!("the format of the config is ok");
        return Ok(());
    }

    match tokio_run(config) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("{e:?}");
            Err(e)
        }
    }
}

fn tokio_run(config: ProxyConfig) -> anyhow::Result<()> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("tgproxy-main");
    if let Some(n) = config.thread_number {
        builder.worker_threads(n);
    }
    let rt = builder.build().context("failed to start runtime")?;

    rt.block_on(async move {
        let (quit_sender, quit_receiver) = tokio::sync::watch::channel(false);
        tgproxy::signal::register(quit_sender).context("failed to setup signal handler")?;

        let daemon = tgproxy::serve::ProxyDaemon::start(config)
            .await
            .context("failed to start proxy servers")?;
        info!("proxy is running");

        daemon.run_until_quit(quit_receiver).await;
        info!("proxy quit");
        Ok(())
    })
}
