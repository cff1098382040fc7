/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod credential;
pub use credential::{CredentialRecord, CredentialStore};

mod trust;
pub use trust::{TrustCache, TrustSnapshot};

mod authorizer;
pub use authorizer::Authorizer;
