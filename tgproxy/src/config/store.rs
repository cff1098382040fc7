/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

const DEFAULT_STORE_PATH: &str = "store-data.json";
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub flush_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl StoreConfig {
    pub(super) fn parse_yaml(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<Self> {
        let mut config = StoreConfig {
            path: lookup_dir.join(DEFAULT_STORE_PATH),
            ..Default::default()
        };
        match v {
            Yaml::Hash(map) => {
                tg_yaml::foreach_kv(map, |k, v| config.set(k, v, lookup_dir))?;
            }
            Yaml::String(_) => {
                config.path = tg_yaml::value::as_path_in_dir(v, lookup_dir)
                    .context("invalid store path value")?;
            }
            Yaml::Null => {}
            _ => return Err(anyhow!("invalid yaml value type for store config")),
        }
        if config.flush_interval.is_zero() {
            return Err(anyhow!("zero flush interval is not allowed"));
        }
        Ok(config)
    }

    fn set(&mut self, k: &str, v: &Yaml, lookup_dir: &Path) -> anyhow::Result<()> {
        match tg_yaml::key::normalize(k).as_str() {
            "path" => {
                self.path = tg_yaml::value::as_path_in_dir(v, lookup_dir)
                    .context(format!("invalid path value for key {k}"))?;
                Ok(())
            }
            "flush_interval" => {
                self.flush_interval = tg_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }
}
