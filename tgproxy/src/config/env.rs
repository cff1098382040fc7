/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, anyhow};
use serde_json::Value;

use super::{ProxyConfig, TlsConfig};
use crate::auth::CredentialRecord;

const DOT_ENV_FILE: &str = ".env";

const ENV_TLS_KEY_PATH: &str = "TLS_KEY_PATH";
const ENV_TLS_CERT_PATH: &str = "TLS_CERT_PATH";
const ENV_HTTP_PORT: &str = "HTTP_PORT";
const ENV_HTTPS_PORT: &str = "HTTPS_PORT";
const ENV_SOCKS_PORT: &str = "SOCKS_PORT";
const ENV_USERS: &str = "USERS";
const ENV_STORE_PATH: &str = "STORE_PATH";
const ENV_LISTEN_IP: &str = "LISTEN_IP";

type EnvVars = BTreeMap<String, String>;

/// Load from the process environment, using variables in `.env` only if not already set
pub(super) fn load() -> anyhow::Result<ProxyConfig> {
    let mut vars: EnvVars = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();

    let dot_env = Path::new(DOT_ENV_FILE);
    if dot_env.is_file() {
        let content = std::fs::read_to_string(dot_env)
            .context(format!("failed to read {}", dot_env.display()))?;
        for (k, v) in parse_dot_env(&content) {
            vars.entry(k).or_insert(v);
        }
    }

    parse_vars(&vars)
}

fn parse_dot_env(content: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = match value.chars().next() {
            Some(q @ ('"' | '\'')) => match value[1..].find(q) {
                Some(end) => &value[1..1 + end],
                None => value,
            },
            _ => match value.find(" #") {
                Some(p) => value[..p].trim_end(),
                None => value,
            },
        };
        vars.push((key.to_string(), value.to_string()));
    }
    vars
}

fn get_var<'a>(vars: &'a EnvVars, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn get_port(vars: &EnvVars, key: &str) -> anyhow::Result<Option<u16>> {
    match get_var(vars, key) {
        Some(v) => {
            let port = u16::from_str(v).map_err(|e| anyhow!("invalid {key} {v}: {e}"))?;
            Ok(Some(port))
        }
        None => Ok(None),
    }
}

fn parse_vars(vars: &EnvVars) -> anyhow::Result<ProxyConfig> {
    let mut config = ProxyConfig {
        http_port: get_port(vars, ENV_HTTP_PORT)?,
        https_port: get_port(vars, ENV_HTTPS_PORT)?,
        socks_port: get_port(vars, ENV_SOCKS_PORT)?,
        ..Default::default()
    };

    if let Some(v) = get_var(vars, ENV_LISTEN_IP) {
        config.listen_ip =
            IpAddr::from_str(v).map_err(|e| anyhow!("invalid {ENV_LISTEN_IP} {v}: {e}"))?;
    }

    match (get_var(vars, ENV_TLS_CERT_PATH), get_var(vars, ENV_TLS_KEY_PATH)) {
        (Some(cert), Some(key)) => {
            config.tls = Some(TlsConfig::new(PathBuf::from(cert), PathBuf::from(key)));
        }
        (None, None) => {}
        (Some(_), None) => return Err(anyhow!("{ENV_TLS_KEY_PATH} is not set")),
        (None, Some(_)) => return Err(anyhow!("{ENV_TLS_CERT_PATH} is not set")),
    }

    if let Some(v) = get_var(vars, ENV_USERS) {
        config.users = parse_users(v).context(format!("invalid {ENV_USERS} value"))?;
    }

    if let Some(v) = get_var(vars, ENV_STORE_PATH) {
        config.store.path = PathBuf::from(v);
    }

    Ok(config)
}

fn parse_users(s: &str) -> anyhow::Result<Vec<CredentialRecord>> {
    let value = serde_json::from_str::<Value>(s).map_err(|e| anyhow!("invalid json: {e}"))?;
    let Value::Array(list) = value else {
        return Err(anyhow!("json value type for users should be array"));
    };

    let mut users = Vec::with_capacity(list.len());
    for (i, v) in list.iter().enumerate() {
        let Value::Object(map) = v else {
            return Err(anyhow!("json value type for user #{i} should be object"));
        };
        let Some(login) = map.get("login").and_then(Value::as_str) else {
            return Err(anyhow!("no valid login found for user #{i}"));
        };
        let Some(password) = map.get("password").and_then(Value::as_str) else {
            return Err(anyhow!("no valid password found for user #{i}"));
        };
        users.push(CredentialRecord::new(login, password));
    }
    Ok(users)
}
