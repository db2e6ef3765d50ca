//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_orchestrator::loading::LoadingCoordinator;
use api_orchestrator::notification::NotificationSink;
use api_orchestrator::transport::{DispatchError, Dispatcher, RequestTarget, TransportFailure};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Success envelope wrapping `body`.
pub fn ok_envelope(body: Value) -> Vec<u8> {
    json!({
        "code": "00000",
        "message": "OK",
        "status": "OK",
        "timestamp": "2024-01-01T00:00:00",
        "body": body,
    })
    .to_string()
    .into_bytes()
}

/// Envelope carrying a non-success code and no body.
pub fn error_envelope(code: &str, message: &str) -> Vec<u8> {
    json!({
        "code": code,
        "message": message,
        "status": "INTERNAL_SERVER_ERROR",
        "timestamp": "2024-01-01T00:00:00",
    })
    .to_string()
    .into_bytes()
}

pub fn timeout() -> Result<Vec<u8>, DispatchError> {
    Err(TransportFailure::timeout("The request timed out.").into())
}

/// In-memory dispatcher that replays a fixed script of responses.
///
/// Records every target it sees and, when given a coordinator, the loading
/// signal at the moment of each dispatch.
pub struct ScriptedDispatcher {
    script: Mutex<VecDeque<Result<Vec<u8>, DispatchError>>>,
    calls: AtomicUsize,
    paths: Mutex<Vec<String>>,
    loading: Option<LoadingCoordinator>,
    loading_seen: Mutex<Vec<bool>>,
}

impl ScriptedDispatcher {
    pub fn new(script: Vec<Result<Vec<u8>, DispatchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
            loading: None,
            loading_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn observing(mut self, loading: LoadingCoordinator) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn dispatch(&self, target: &RequestTarget) -> Result<Vec<u8>, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(target.path().to_string());
        if let Some(loading) = &self.loading {
            self.loading_seen.lock().unwrap().push(loading.is_loading());
        }
        // Let concurrent calls interleave.
        tokio::task::yield_now().await;

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::timeout("script exhausted").into()))
    }
}

/// Notification sink that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Coordinator with the default reset delays.
pub fn coordinator() -> LoadingCoordinator {
    LoadingCoordinator::new(Duration::from_secs(15), Duration::from_secs(60))
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// `f` receives the raw request (head and body) and returns the status code
/// and JSON body to answer with. Status `0` closes the connection without
/// answering.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        let (status, body) = f(request).await;
                        if status == 0 {
                            let _ = socket.shutdown().await;
                            return;
                        }
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
