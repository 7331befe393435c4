//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Notify};

use pregunta_relay::lifecycle::{self, Shutdown};
use pregunta_relay::RelayConfig;

/// A mock backend's address plus what it observed.
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request targets received so far (e.g. "/buscar/?pregunta=hola").
    pub fn targets(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

/// Read the request head and remember its target.
async fn read_head(socket: &mut TcpStream, request_lines: &Mutex<Vec<String>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let text = String::from_utf8_lossy(&head);
    if let Some(target) = text.lines().next().and_then(|l| l.split(' ').nth(1)) {
        request_lines.lock().unwrap().push(target.to_string());
    }
}

/// Start a backend; `serve` writes the whole response for each connection.
async fn start_backend<F, Fut>(serve: F) -> MockBackend
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let request_lines = Arc::new(Mutex::new(Vec::new()));
    let serve = Arc::new(serve);

    let (h, r) = (hits.clone(), request_lines.clone());
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    h.fetch_add(1, Ordering::SeqCst);
                    let (serve, r) = (serve.clone(), r.clone());
                    tokio::spawn(async move {
                        read_head(&mut socket, &r).await;
                        serve(socket).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend {
        addr,
        hits,
        request_lines,
    }
}

/// Backend answering every request with a fixed status, content type and body.
pub async fn start_mock_backend(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> MockBackend {
    start_backend(move |mut socket| async move {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    })
    .await
}

fn chunk(data: &str) -> String {
    format!("{:x}\r\n{}\r\n", data.len(), data)
}

const CHUNKED_HEAD: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";

/// Backend that sends the first chunk, then waits for `gate` before the rest.
pub async fn start_gated_backend(chunks: Vec<&'static str>, gate: Arc<Notify>) -> MockBackend {
    start_backend(move |mut socket| {
        let chunks = chunks.clone();
        let gate = gate.clone();
        async move {
            let _ = socket.write_all(CHUNKED_HEAD.as_bytes()).await;
            let mut iter = chunks.into_iter();
            if let Some(first) = iter.next() {
                let _ = socket.write_all(chunk(first).as_bytes()).await;
                let _ = socket.flush().await;
            }
            gate.notified().await;
            for data in iter {
                let _ = socket.write_all(chunk(data).as_bytes()).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
            let _ = socket.shutdown().await;
        }
    })
    .await
}

/// Backend that sends headers and one chunk, then stalls without closing.
pub async fn start_stalling_backend(first: &'static str) -> MockBackend {
    start_backend(move |mut socket| async move {
        let _ = socket.write_all(CHUNKED_HEAD.as_bytes()).await;
        let _ = socket.write_all(chunk(first).as_bytes()).await;
        tokio::time::sleep(Duration::from_secs(3600)).await;
        drop(socket);
    })
    .await
}

/// Backend that accepts and reads but never answers.
pub async fn start_hanging_backend() -> MockBackend {
    start_backend(|socket| async move {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        drop(socket);
    })
    .await
}

/// Backend that streams chunks until writing fails, then reports on `closed`.
pub async fn start_endless_backend(closed: oneshot::Sender<()>) -> MockBackend {
    let closed = Arc::new(Mutex::new(Some(closed)));
    start_backend(move |mut socket| {
        let closed = closed.clone();
        async move {
            let _ = socket.write_all(CHUNKED_HEAD.as_bytes()).await;
            loop {
                if socket.write_all(chunk("{\"respuesta\":\"x\"}\n").as_bytes()).await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            if let Some(tx) = closed.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }
    })
    .await
}

/// A relay running against `backend`.
pub struct TestRelay {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, query: &str) -> String {
        format!("http://{}/api/proxy{}", self.addr, query)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay pointed at `backend`; `tune` adjusts the config first.
pub async fn start_relay(backend: SocketAddr, tune: impl FnOnce(&mut RelayConfig)) -> TestRelay {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.host = backend.ip().to_string();
    config.backend.port = backend.port();
    tune(&mut config);

    let shutdown = Shutdown::new();
    let running = lifecycle::launch(config, &shutdown).await.unwrap();
    TestRelay {
        addr: running.local_addr,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
