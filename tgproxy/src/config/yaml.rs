/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::{ProxyConfig, StoreConfig, TimeoutConfig, TlsConfig};
use crate::auth::CredentialRecord;

pub(super) fn load_file(path: &Path) -> anyhow::Result<ProxyConfig> {
    let doc = tg_yaml::load_doc(path)?;
    let conf_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    parse_doc(&doc, conf_dir)
}

fn parse_doc(doc: &Yaml, conf_dir: &Path) -> anyhow::Result<ProxyConfig> {
    let Yaml::Hash(map) = doc else {
        return Err(anyhow!("yaml doc root should be hash"));
    };

    let mut config = ProxyConfig {
        store: StoreConfig::parse_yaml(&Yaml::Null, conf_dir)?,
        ..Default::default()
    };
    tg_yaml::foreach_kv(map, |k, v| set(&mut config, k, v, conf_dir))?;
    Ok(config)
}

fn set(config: &mut ProxyConfig, k: &str, v: &Yaml, conf_dir: &Path) -> anyhow::Result<()> {
    match tg_yaml::key::normalize(k).as_str() {
        "runtime" => load_runtime(config, v),
        "listen_ip" => {
            config.listen_ip = tg_yaml::value::as_ipaddr(v)
                .context(format!("invalid ip address value for key {k}"))?;
            Ok(())
        }
        "http_port" => {
            config.http_port = as_optional_port(v).context(format!("invalid port for key {k}"))?;
            Ok(())
        }
        "https_port" => {
            config.https_port = as_optional_port(v).context(format!("invalid port for key {k}"))?;
            Ok(())
        }
        "socks_port" => {
            config.socks_port = as_optional_port(v).context(format!("invalid port for key {k}"))?;
            Ok(())
        }
        "tls" => {
            let tls = TlsConfig::parse_yaml(v, conf_dir)
                .context(format!("invalid tls config value for key {k}"))?;
            config.tls = Some(tls);
            Ok(())
        }
        "users" | "user" => {
            config.users = tg_yaml::value::as_list(v, as_credential_record)
                .context(format!("invalid user list value for key {k}"))?;
            Ok(())
        }
        "store" => {
            config.store = StoreConfig::parse_yaml(v, conf_dir)
                .context(format!("invalid store config value for key {k}"))?;
            Ok(())
        }
        "connect_default_port" => {
            config.connect_default_port =
                tg_yaml::value::as_u16(v).context(format!("invalid u16 value for key {k}"))?;
            Ok(())
        }
        "max_header_size" => {
            config.max_header_size = tg_yaml::humanize::as_usize(v)
                .context(format!("invalid humanize usize value for key {k}"))?;
            Ok(())
        }
        "timeout" => {
            config.timeout = TimeoutConfig::parse_yaml(v)
                .context(format!("invalid timeout config value for key {k}"))?;
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k} in main conf")),
    }
}

fn load_runtime(config: &mut ProxyConfig, v: &Yaml) -> anyhow::Result<()> {
    match v {
        Yaml::Hash(map) => tg_yaml::foreach_kv(map, |k, v| {
            match tg_yaml::key::normalize(k).as_str() {
                "thread_number" => {
                    let n = tg_yaml::value::as_usize(v)
                        .context(format!("invalid usize value for key {k}"))?;
                    if n == 0 {
                        return Err(anyhow!("zero thread number is not allowed"));
                    }
                    config.thread_number = Some(n);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            }
        }),
        Yaml::Null => Ok(()),
        _ => Err(anyhow!("root value type should be hash")),
    }
}

fn as_optional_port(v: &Yaml) -> anyhow::Result<Option<u16>> {
    match v {
        Yaml::Null => Ok(None),
        _ => tg_yaml::value::as_u16(v).map(Some),
    }
}

fn as_credential_record(v: &Yaml) -> anyhow::Result<CredentialRecord> {
    let Yaml::Hash(map) = v else {
        return Err(anyhow!("yaml value type for user should be hash"));
    };
    let mut record = CredentialRecord::new("", "");
    tg_yaml::foreach_kv(map, |k, v| match tg_yaml::key::normalize(k).as_str() {
        "login" | "name" => {
            record.login = tg_yaml::value::as_string(v)?;
            Ok(())
        }
        "password" => {
            record.password = tg_yaml::value::as_string(v)?;
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;
    if record.login.is_empty() {
        return Err(anyhow!("no login set"));
    }
    Ok(record)
}
