/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};

use foldhash::fast::FixedState;

/// Logins and the source ip addresses they have been verified from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustSnapshot {
    pub logins: BTreeMap<String, BTreeSet<IpAddr>>,
}

impl TrustSnapshot {
    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }

    pub fn ip_count(&self) -> usize {
        self.logins.values().map(|s| s.len()).sum()
    }
}

#[derive(Default)]
struct TrustTable {
    logins: HashMap<String, HashSet<IpAddr, FixedState>, FixedState>,
    reverse: HashMap<IpAddr, String, FixedState>,
    revision: u64,
}

impl TrustTable {
    fn insert(&mut self, login: &str, ip: IpAddr) -> bool {
        let added = match self.logins.get_mut(login) {
            Some(set) => set.insert(ip),
            None => {
                let mut set = HashSet::with_hasher(FixedState::default());
                set.insert(ip);
                self.logins.insert(login.to_string(), set);
                true
            }
        };
        if added {
            self.reverse
                .entry(ip)
                .or_insert_with(|| login.to_string());
        }
        added
    }
}

/// Append only mapping from verified logins to their source ip addresses
///
/// IPv4-mapped IPv6 addresses are stored as IPv4, so a client matches on both
/// v4 and dual stack listeners.
#[derive(Default)]
pub struct TrustCache {
    inner: Mutex<TrustTable>,
}

impl TrustCache {
    pub fn new() -> Self {
        TrustCache::default()
    }

    /// Get the first login that has been verified from this address
    pub fn lookup(&self, ip: IpAddr) -> Option<String> {
        let ip = ip.to_canonical();
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table.reverse.get(&ip).cloned()
    }

    /// Associate `ip` with `login`, return true if it is a new association
    pub fn record(&self, login: &str, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if table.insert(login, ip) {
            table.revision += 1;
            true
        } else {
            false
        }
    }

    /// Advanced on every new association
    pub fn revision(&self) -> u64 {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table.revision
    }

    pub fn snapshot(&self) -> TrustSnapshot {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let logins = table
            .logins
            .iter()
            .map(|(login, ips)| (login.clone(), ips.iter().copied().collect()))
            .collect();
        TrustSnapshot { logins }
    }

    /// Merge a snapshot into the cache, logins are applied in sorted order
    pub fn restore(&self, snapshot: TrustSnapshot) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for (login, ips) in snapshot.logins {
            for ip in ips {
                table.insert(&login, ip.to_canonical());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::sync::Arc;

    const IP1: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    const IP2: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2));

    #[test]
    fn record_and_lookup() {
        let cache = TrustCache::new();
        assert_eq!(cache.lookup(IP1), None);
        assert_eq!(cache.revision(), 0);

        assert!(cache.record("alice", IP1));
        assert!(!cache.record("alice", IP1));
        assert_eq!(cache.revision(), 1);
        assert_eq!(cache.lookup(IP1).as_deref(), Some("alice"));
        assert_eq!(cache.lookup(IP2), None);

        assert!(cache.record("alice", IP2));
        assert_eq!(cache.revision(), 2);
        assert_eq!(cache.lookup(IP2).as_deref(), Some("alice"));
    }

    #[test]
    fn shared_ip() {
        let cache = TrustCache::new();
        assert!(cache.record("alice", IP1));
        assert!(cache.record("bob", IP1));
        assert_eq!(cache.lookup(IP1).as_deref(), Some("alice"));

        let snapshot = cache.snapshot();
        assert!(snapshot.logins["alice"].contains(&IP1));
        assert!(snapshot.logins["bob"].contains(&IP1));
        assert_eq!(snapshot.ip_count(), 2);
    }

    #[test]
    fn mapped_v6() {
        let cache = TrustCache::new();
        let mapped = IpAddr::V6(Ipv4Addr::new(192, 0, 2, 1).to_ipv6_mapped());
        assert!(cache.record("alice", mapped));
        assert_eq!(cache.lookup(IP1).as_deref(), Some("alice"));
        assert!(!cache.record("alice", IP1));

        let v6 = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        assert!(cache.record("bob", v6));
        assert_eq!(cache.lookup(v6).as_deref(), Some("bob"));
    }

    #[test]
    fn snapshot_restore() {
        let cache = TrustCache::new();
        cache.record("bob", IP2);
        cache.record("alice", IP1);
        cache.record("alice", IP2);

        let snapshot = cache.snapshot();
        let restored = TrustCache::new();
        restored.restore(snapshot.clone());
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.revision(), 0);
        // sorted restore, alice comes first
        assert_eq!(restored.lookup(IP2).as_deref(), Some("alice"));
        assert_eq!(restored.lookup(IP1).as_deref(), Some("alice"));
    }

    #[test]
    fn concurrent_record() {
        let cache = Arc::new(TrustCache::new());
        let mut handles = Vec::new();
        for i in 0..8u8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..32u8 {
                    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, i, j));
                    cache.record("alice", ip);
                    assert_eq!(cache.lookup(ip).as_deref(), Some("alice"));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.revision(), 256);
        assert_eq!(cache.snapshot().ip_count(), 256);
    }
}
