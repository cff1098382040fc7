/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::IpAddr;
use std::sync::Arc;

use http::HeaderValue;
use log::{debug, info};

use tg_types::net::http::HttpAuth;

use super::{CredentialStore, TrustCache};

/// Decide who a client is, either by its source address or by Basic credentials
pub struct Authorizer {
    credentials: CredentialStore,
    trust: Arc<TrustCache>,
}

impl Authorizer {
    pub fn new(credentials: CredentialStore, trust: Arc<TrustCache>) -> Self {
        Authorizer { credentials, trust }
    }

    pub fn trust_cache(&self) -> &Arc<TrustCache> {
        &self.trust
    }

    /// Authorize an http or https request
    ///
    /// A source address that has been verified before is accepted without looking at the
    /// header. Otherwise the Basic credentials in the header must match a configured user,
    /// and the source address will be trusted for that user from now on.
    pub fn authorize(&self, proxy_auth: Option<&HeaderValue>, source: IpAddr) -> Option<String> {
        if let Some(login) = self.trust.lookup(source) {
            return Some(login);
        }

        let value = proxy_auth?;
        let basic = match HttpAuth::try_from(value) {
            Ok(HttpAuth::Basic(basic)) => basic,
            Ok(HttpAuth::None) => {
                debug!("unsupported proxy auth scheme from {source}");
                return None;
            }
            Err(e) => {
                debug!("invalid proxy auth header from {source}: {e}");
                return None;
            }
        };
        if !self.credentials.verify(&basic.username, &basic.password) {
            debug!("credential verify failed for user {} from {source}", basic.username);
            return None;
        }

        if self.trust.record(&basic.username, source) {
            info!("added ip {} for user {}", source.to_canonical(), basic.username);
        }
        Some(basic.username)
    }

    /// Authorize a socks5 connection, which carries no credentials
    pub fn authorize_by_source(&self, source: IpAddr) -> Option<String> {
        self.trust.lookup(source)
    }
}
