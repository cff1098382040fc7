/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::str::FromStr;

use log::warn;
use serde_json::{Map, Value};

use super::StoreError;
use crate::auth::TrustSnapshot;

const KEY_LOGGED_IN_IPS: &str = "logged_in_ips";
const KEY_LEGACY_LOGGED_IN_IPS: &str = "loggedInIps";

/// Login used for addresses restored from a legacy snapshot, which records no identity
const LEGACY_LOGIN: &str = "";

pub(super) fn encode(snapshot: &TrustSnapshot) -> Value {
    let mut logins = Map::new();
    for (login, ips) in &snapshot.logins {
        let ips = ips.iter().map(|ip| Value::String(ip.to_string())).collect();
        logins.insert(login.clone(), Value::Array(ips));
    }

    let mut root = Map::new();
    root.insert(KEY_LOGGED_IN_IPS.to_string(), Value::Object(logins));
    Value::Object(root)
}

pub(super) fn decode(value: &Value) -> Result<TrustSnapshot, StoreError> {
    let Value::Object(root) = value else {
        return Err(StoreError::InvalidFormat("root value should be object"));
    };

    let mut snapshot = TrustSnapshot::default();
    if let Some(v) = root.get(KEY_LOGGED_IN_IPS) {
        let Value::Object(map) = v else {
            return Err(StoreError::InvalidFormat("logged_in_ips should be object"));
        };
        for (login, ips) in map {
            let Value::Array(list) = ips else {
                warn!("skip user {login} in snapshot as the ip list is not an array");
                continue;
            };
            let set = snapshot.logins.entry(login.clone()).or_default();
            decode_ip_list(list, set);
        }
    }
    if let Some(v) = root.get(KEY_LEGACY_LOGGED_IN_IPS) {
        let Value::Array(list) = v else {
            return Err(StoreError::InvalidFormat("loggedInIps should be array"));
        };
        let set = snapshot
            .logins
            .entry(LEGACY_LOGIN.to_string())
            .or_default();
        decode_ip_list(list, set);
    }
    snapshot.logins.retain(|_, ips| !ips.is_empty());
    Ok(snapshot)
}

fn decode_ip_list(list: &[Value], set: &mut BTreeSet<IpAddr>) {
    for v in list {
        let Value::String(s) = v else {
            warn!("skip non string ip value {v} in snapshot");
            continue;
        };
        match IpAddr::from_str(s) {
            Ok(ip) => {
                set.insert(ip.to_canonical());
            }
            Err(_) => warn!("skip invalid ip address {s} in snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn encode_sorted() {
        let mut snapshot = TrustSnapshot::default();
        snapshot.logins.insert(
            "bob".to_string(),
            BTreeSet::from([IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))]),
        );
        snapshot.logins.insert(
            "alice".to_string(),
            BTreeSet::from([
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9)),
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            ]),
        );
        let s = serde_json::to_string(&encode(&snapshot)).unwrap();
        assert_eq!(
            s,
            r#"{"logged_in_ips":{"alice":["10.0.0.1","10.0.0.9"],"bob":["10.0.0.2"]}}"#
        );
    }

    #[test]
    fn decode_current() {
        let v: Value = serde_json::from_str(
            r#"{"logged_in_ips":{"alice":["10.0.0.1","::ffff:10.0.0.2","2001:db8::1"]}}"#,
        )
        .unwrap();
        let snapshot = decode(&v).unwrap();
        let ips = &snapshot.logins["alice"];
        assert_eq!(ips.len(), 3);
        assert!(ips.contains(&IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
        assert!(ips.contains(&IpAddr::from_str("2001:db8::1").unwrap()));
    }

    #[test]
    fn decode_legacy() {
        let v: Value = serde_json::from_str(r#"{"loggedInIps":["10.0.0.1","10.0.0.3"]}"#).unwrap();
        let snapshot = decode(&v).unwrap();
        assert_eq!(snapshot.logins.len(), 1);
        assert_eq!(snapshot.logins[LEGACY_LOGIN].len(), 2);
    }

    #[test]
    fn decode_skip_invalid() {
        let v: Value = serde_json::from_str(
            r#"{"logged_in_ips":{"alice":["10.0.0.1","not-an-ip",7],"bob":"10.0.0.2","carol":[]}}"#,
        )
        .unwrap();
        let snapshot = decode(&v).unwrap();
        assert_eq!(snapshot.logins.len(), 1);
        assert_eq!(snapshot.ip_count(), 1);
    }

    #[test]
    fn decode_invalid() {
        let v: Value = serde_json::from_str("[]").unwrap();
        assert!(decode(&v).is_err());
        let v: Value = serde_json::from_str(r#"{"logged_in_ips":[]}"#).unwrap();
        assert!(decode(&v).is_err());
        let v: Value = serde_json::from_str(r#"{"loggedInIps":{}}"#).unwrap();
        assert!(decode(&v).is_err());

        let v: Value = serde_json::from_str("{}").unwrap();
        assert!(decode(&v).unwrap().is_empty());
    }
}
