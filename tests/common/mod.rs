#![allow(dead_code)]

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use item_recovery::errors::{RecoveryError, Result};
use item_recovery::fetcher::{JsonRequest, Transport};

/// Canned HTTP reply for the local responder.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serves every connection with `route(request_target)`; returns the base URL.
pub async fn serve<F>(route: F) -> String
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let route = Arc::new(route);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let route = route.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();

                let reply = (route.as_ref())(&target);
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Transport whose every call fails like an unreachable host, counting calls.
#[derive(Default)]
pub struct DownTransport {
    pub calls: AtomicUsize,
}

impl DownTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for DownTransport {
    async fn get_json(&self, request: &JsonRequest) -> Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RecoveryError::ConnectionFailure(format!(
            "dns error for {}",
            request.url
        )))
    }
}

/// Transport that answers only URLs starting with `prefix`.
pub struct OnlyPrefixTransport {
    pub prefix: String,
    pub body: serde_json::Value,
    pub calls: AtomicUsize,
}

impl OnlyPrefixTransport {
    pub fn new(prefix: &str, body: serde_json::Value) -> Self {
        Self {
            prefix: prefix.to_string(),
            body,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for OnlyPrefixTransport {
    async fn get_json(&self, request: &JsonRequest) -> Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.url.starts_with(&self.prefix) {
            Ok(self.body.clone())
        } else {
            Err(RecoveryError::Timeout(request.url.clone()))
        }
    }
}
