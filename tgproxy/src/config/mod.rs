/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, anyhow};

use crate::auth::CredentialRecord;
use crate::opts::ProcArgs;

mod env;
mod yaml;

mod store;
pub use store::StoreConfig;

mod timeout;
pub use timeout::TimeoutConfig;

mod tls;
pub use tls::TlsConfig;

const DEFAULT_CONNECT_PORT: u16 = 443;
const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;
const MINIMAL_HEADER_SIZE: usize = 1024;

#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub thread_number: Option<usize>,
    pub listen_ip: IpAddr,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub socks_port: Option<u16>,
    pub tls: Option<TlsConfig>,
    pub users: Vec<CredentialRecord>,
    pub store: StoreConfig,
    pub connect_default_port: u16,
    pub max_header_size: usize,
    pub timeout: TimeoutConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            thread_number: None,
            listen_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: None,
            https_port: None,
            socks_port: None,
            tls: None,
            users: Vec::new(),
            store: StoreConfig::default(),
            connect_default_port: DEFAULT_CONNECT_PORT,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            timeout: TimeoutConfig::default(),
        }
    }
}

impl ProxyConfig {
    pub fn check(&self) -> anyhow::Result<()> {
        if self.http_port.is_none() && self.https_port.is_none() && self.socks_port.is_none() {
            return Err(anyhow!("no listen port is set"));
        }
        for (name, port) in [
            ("http_port", self.http_port),
            ("https_port", self.https_port),
            ("socks_port", self.socks_port),
        ] {
            if port == Some(0) {
                return Err(anyhow!("invalid zero value for {name}"));
            }
        }
        if self.https_port.is_some() && self.tls.is_none() {
            return Err(anyhow!("tls certificate and private key are required by https_port"));
        }

        let mut logins = BTreeSet::new();
        for user in &self.users {
            if user.login.is_empty() {
                return Err(anyhow!("empty user login is not allowed"));
            }
            if !logins.insert(user.login.as_str()) {
                return Err(anyhow!("duplicate user login {}", user.login));
            }
        }

        if self.connect_default_port == 0 {
            return Err(anyhow!("invalid zero value for connect_default_port"));
        }
        if self.max_header_size < MINIMAL_HEADER_SIZE {
            return Err(anyhow!(
                "max_header_size should be at least {MINIMAL_HEADER_SIZE}"
            ));
        }
        Ok(())
    }
}

/// Load the config from the config file if set, or else from the environment
pub fn load(args: &ProcArgs) -> anyhow::Result<ProxyConfig> {
    let config = match &args.config_file {
        Some(path) => yaml::load_file(path)
            .context(format!("failed to load config file {}", path.display()))?,
        None => env::load().context("failed to load config from environment")?,
    };
    config.check()?;
    Ok(config)
}
