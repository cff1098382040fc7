/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

/// PEM encoded certificate chain and private key used by the https listener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsConfig {
    pub certificate: PathBuf,
    pub private_key: PathBuf,
}

impl TlsConfig {
    pub fn new(certificate: PathBuf, private_key: PathBuf) -> Self {
        TlsConfig {
            certificate,
            private_key,
        }
    }

    pub(super) fn parse_yaml(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for tls config should be hash"));
        };

        let mut certificate = None;
        let mut private_key = None;
        tg_yaml::foreach_kv(map, |k, v| match tg_yaml::key::normalize(k).as_str() {
            "certificate" | "cert" => {
                let path = tg_yaml::value::as_file_path(v, lookup_dir)
                    .context(format!("invalid certificate file path value for key {k}"))?;
                certificate = Some(path);
                Ok(())
            }
            "private_key" | "key" => {
                let path = tg_yaml::value::as_file_path(v, lookup_dir)
                    .context(format!("invalid private key file path value for key {k}"))?;
                private_key = Some(path);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;

        match (certificate, private_key) {
            (Some(certificate), Some(private_key)) => Ok(TlsConfig::new(certificate, private_key)),
            (None, _) => Err(anyhow!("no certificate set")),
            (_, None) => Err(anyhow!("no private key set")),
        }
    }
}
