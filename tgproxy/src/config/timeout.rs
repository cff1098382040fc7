/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub negotiation: Duration,
    pub tls_accept: Duration,
    pub connect: Duration,
    pub idle_check: Duration,
    /// zero means idle tunnels are never closed
    pub max_idle_count: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        TimeoutConfig {
            negotiation: Duration::from_secs(4),
            tls_accept: Duration::from_secs(10),
            connect: Duration::from_secs(30),
            idle_check: Duration::from_secs(60),
            max_idle_count: 5,
        }
    }
}

impl TimeoutConfig {
    pub(super) fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let mut config = TimeoutConfig::default();
        match v {
            Yaml::Hash(map) => tg_yaml::foreach_kv(map, |k, v| config.set(k, v))?,
            Yaml::Null => {}
            _ => return Err(anyhow!("yaml value type for timeout config should be hash")),
        }
        if config.idle_check.is_zero() {
            return Err(anyhow!("zero idle check interval is not allowed"));
        }
        Ok(config)
    }

    fn set(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        let key = tg_yaml::key::normalize(k);
        let slot = match key.as_str() {
            "negotiation" => &mut self.negotiation,
            "tls_accept" => &mut self.tls_accept,
            "connect" => &mut self.connect,
            "idle_check" => &mut self.idle_check,
            "max_idle_count" => {
                self.max_idle_count = tg_yaml::value::as_usize(v)
                    .context(format!("invalid usize value for key {k}"))?;
                return Ok(());
            }
            _ => return Err(anyhow!("invalid key {k}")),
        };
        *slot = tg_yaml::humanize::as_duration(v)
            .context(format!("invalid humanize duration value for key {k}"))?;
        Ok(())
    }
}
