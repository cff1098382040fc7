/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use super::SocksProxyServer;
use crate::auth::{Authorizer, CredentialStore, TrustCache};
use crate::serve::{ListenTcpRuntime, ServerContext};

async fn start_proxy(trusted: bool) -> (SocketAddr, watch::Sender<bool>) {
    let trust = Arc::new(TrustCache::new());
    if trusted {
        trust.record("alice", IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    let authorizer = Arc::new(Authorizer::new(CredentialStore::new(&[]), trust));
    let server = SocksProxyServer::new(ServerContext::for_test(authorizer));
    let runtime = ListenTcpRuntime::bind(server, "127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = runtime.local_addr().unwrap();
    let (quit_sender, quit_receiver) = watch::channel(false);
    tokio::spawn(runtime.run(quit_receiver));
    (addr, quit_sender)
}

async fn start_echo() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (mut r, mut w) = stream.split();
                let _ = tokio::io::copy(&mut r, &mut w).await;
            });
        }
    });
    addr
}

fn connect_request(command: u8, port: u16) -> Vec<u8> {
    let mut buf = vec![0x05, command, 0x00, 0x01, 127, 0, 0, 1];
    buf.extend_from_slice(&port.to_be_bytes());
    buf
}

/// Finish the method selection and send the request, returning the reply
async fn request(proxy_addr: SocketAddr, command: u8, port: u16) -> (TcpStream, [u8; 10]) {
    let mut stream = TcpStream::connect(proxy_addr).await.unwrap();
    stream.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    let mut method = [0u8; 2];
    stream.read_exact(&mut method).await.unwrap();
    assert_eq!(method, [0x05, 0x00]);

    stream
        .write_all(&connect_request(command, port))
        .await
        .unwrap();
    let mut reply = [0u8; 10];
    stream.read_exact(&mut reply).await.unwrap();
    (stream, reply)
}

#[tokio::test]
async fn trusted_connect() {
    let (proxy_addr, _quit) = start_proxy(true).await;
    let echo_addr = start_echo().await;

    let (mut stream, reply) = request(proxy_addr, 0x01, echo_addr.port()).await;
    assert_eq!(&reply[..4], &[0x05, 0x00, 0x00, 0x01]);
    assert_eq!(&reply[4..8], &[127, 0, 0, 1]);

    stream.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");
}

#[tokio::test]
async fn untrusted_denied() {
    let (proxy_addr, _quit) = start_proxy(false).await;
    let echo_addr = start_echo().await;

    let (mut stream, reply) = request(proxy_addr, 0x01, echo_addr.port()).await;
    assert_eq!(reply, [0x05, 0x02, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    assert!(buf.is_empty());
}

#[tokio::test]
async fn no_acceptable_method() {
    let (proxy_addr, _quit) = start_proxy(true).await;

    let mut stream = TcpStream::connect(proxy_addr).await.unwrap();
    stream.write_all(&[0x05, 0x01, 0x02]).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    assert_eq!(buf, [0x05, 0xFF]);
}

#[tokio::test]
async fn bind_not_supported() {
    let (proxy_addr, _quit) = start_proxy(true).await;

    let (_stream, reply) = request(proxy_addr, 0x02, 80).await;
    assert_eq!(reply[1], 0x07);
}

#[tokio::test]
async fn connection_refused() {
    let (proxy_addr, _quit) = start_proxy(true).await;
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let (_stream, reply) = request(proxy_addr, 0x01, port).await;
    assert_eq!(reply[1], 0x05);
}

#[tokio::test]
async fn invalid_version() {
    let (proxy_addr, _quit) = start_proxy(true).await;

    let mut stream = TcpStream::connect(proxy_addr).await.unwrap();
    stream.write_all(&[0x04, 0x01, 0x00]).await.unwrap();
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
    assert!(buf.is_empty());
}
