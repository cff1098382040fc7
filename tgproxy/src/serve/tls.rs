/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use anyhow::{Context, anyhow};
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use tokio_rustls::{TlsAcceptor, TlsConnector};

use tg_types::net::{Host, UpstreamAddr};

use crate::config::TlsConfig;

pub(crate) fn build_tls_acceptor(config: &TlsConfig) -> anyhow::Result<TlsAcceptor> {
    let certs = CertificateDer::pem_file_iter(&config.certificate)
        .map_err(|e| anyhow!("failed to open certificate file: {e}"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("invalid certificate file: {e}"))?;
    if certs.is_empty() {
        return Err(anyhow!(
            "no certificate found in {}",
            config.certificate.display()
        ));
    }
    let key = PrivateKeyDer::from_pem_file(&config.private_key)
        .map_err(|e| anyhow!("invalid private key file: {e}"))?;

    let server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("failed to build tls server config")?;
    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

/// Tls connector for https origins, verified by the webpki root certificates
pub(crate) fn build_tls_connector() -> TlsConnector {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let client_config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(client_config))
}

pub(crate) fn tls_server_name(upstream: &UpstreamAddr) -> anyhow::Result<ServerName<'static>> {
    match upstream.host() {
        Host::Ip(ip) => Ok(ServerName::from(*ip)),
        Host::Domain(domain) => ServerName::try_from(domain.to_string())
            .map_err(|e| anyhow!("invalid tls server name {domain}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;

    #[test]
    fn server_name() {
        let upstream = UpstreamAddr::from_host_str_and_port("example.com", 443).unwrap();
        let name = tls_server_name(&upstream).unwrap();
        assert_eq!(name.to_str(), "example.com");

        let upstream = UpstreamAddr::new(Host::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)), 443);
        let name = tls_server_name(&upstream).unwrap();
        assert!(matches!(name, ServerName::IpAddress(_)));
    }

    #[test]
    fn acceptor_invalid_files() {
        let dir = std::env::temp_dir();
        let config = TlsConfig::new(
            dir.join("tgproxy-no-such-cert.pem"),
            dir.join("tgproxy-no-such-key.pem"),
        );
        assert!(build_tls_acceptor(&config).is_err());

        let cert = dir.join(format!("tgproxy-empty-cert-{}.pem", std::process::id()));
        std::fs::write(&cert, b"not a pem file\n").unwrap();
        let config = TlsConfig::new(cert.clone(), PathBuf::from("/nonexistent/key.pem"));
        assert!(build_tls_acceptor(&config).is_err());
        std::fs::remove_file(&cert).unwrap();
    }

    #[test]
    fn connector() {
        let _ = build_tls_connector();
    }
}
