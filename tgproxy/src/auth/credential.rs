/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;
use std::fmt;

use foldhash::fast::FixedState;

#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub login: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(login: &str, password: &str) -> Self {
        CredentialRecord {
            login: login.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Static login to password mapping, read only after startup
#[derive(Default)]
pub struct CredentialStore {
    users: HashMap<String, String, FixedState>,
}

impl CredentialStore {
    pub fn new(records: &[CredentialRecord]) -> Self {
        let mut users = HashMap::with_capacity_and_hasher(records.len(), FixedState::default());
        for r in records {
            users
                .entry(r.login.clone())
                .or_insert_with(|| r.password.clone());
        }
        CredentialStore { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn verify(&self, login: &str, password: &str) -> bool {
        match self.users.get(login) {
            Some(expected) => constant_time_eq::constant_time_eq(
                expected.as_bytes(),
                password.as_bytes(),
            ),
            None => false,
        }
    }
}
