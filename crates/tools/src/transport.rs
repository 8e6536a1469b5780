//! Single-shot HTTP transport to the workspace service.

use crate::error::ToolError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Characters of a non-JSON body quoted back in the protocol error.
pub const NON_JSON_PREVIEW_CHARS: usize = 100;

const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Everything needed for one network round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub token: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl TransportRequest {
    pub fn post(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            token: token.into(),
            body: None,
            timeout: crate::retry::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Classified result of exactly one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Ok(Value),
    /// Worth another attempt while budget remains.
    Retryable(ToolError),
    /// Returned to the caller immediately regardless of budget.
    Terminal(ToolError),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Never retries and never panics on network
    /// errors; every failure is folded into the outcome.
    async fn send(&self, request: &TransportRequest) -> AttemptOutcome;
}

/// `reqwest`-backed transport. Dropping the returned future aborts the
/// request in flight.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> AttemptOutcome {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let mut builder = builder
            .bearer_auth(&request.token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = describe_send_error(&e, request.timeout);
                warn!("{} {} failed: {}", request.method, request.url, reason);
                return AttemptOutcome::Retryable(ToolError::Transport(reason));
            }
        };

        let status = response.status();
        debug!("{} {} -> {}", request.method, request.url, status);

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let reason = describe_send_error(&e, request.timeout);
                warn!("Failed to read response body from {}: {}", request.url, reason);
                return AttemptOutcome::Retryable(ToolError::Transport(reason));
            }
        };

        classify_response(status.is_success(), &text)
    }
}

/// Map a fully-read response onto an attempt outcome.
pub fn classify_response(is_success: bool, body: &str) -> AttemptOutcome {
    if !is_success {
        return AttemptOutcome::Retryable(ToolError::Transport(error_message(body)));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(payload) => AttemptOutcome::Ok(payload),
        Err(_) => {
            let preview: String = body.chars().take(NON_JSON_PREVIEW_CHARS).collect();
            AttemptOutcome::Terminal(ToolError::Protocol(format!(
                "Non-JSON response: {}",
                preview
            )))
        }
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

fn describe_send_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("Request timed out after {}ms", timeout.as_millis())
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else {
        format!("HTTP request failed: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        )
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
            if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Accept one connection, capture the raw request, answer with `response`
    /// after `delay`.
    async fn serve_once(response: String, delay: Duration) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_json_success_is_ok_and_sends_headers() {
        let (base, server) = serve_once(
            http_response("200 OK", "application/json", r#"{"files":["a.ts"]}"#),
            Duration::ZERO,
        )
        .await;

        let request = TransportRequest::post(format!("{}/api/editor/find-files", base), "tok-123")
            .with_body(Some(json!({"dir": "src", "suffixes": ["ts"]})));
        let outcome = HttpTransport::new().send(&request).await;
        assert_eq!(outcome, AttemptOutcome::Ok(json!({"files": ["a.ts"]})));

        let raw = server.await.unwrap().to_lowercase();
        assert!(raw.starts_with("post /api/editor/find-files"));
        assert!(raw.contains("authorization: bearer tok-123"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.contains(r#""suffixes":["ts"]"#));
    }

    #[tokio::test]
    async fn test_non_json_success_is_terminal() {
        let (base, _server) = serve_once(
            http_response("200 OK", "text/html", "<html>gateway</html>"),
            Duration::ZERO,
        )
        .await;

        let outcome = HttpTransport::new()
            .send(&TransportRequest::post(format!("{}/api/editor/lint", base), "tok"))
            .await;
        assert_eq!(
            outcome,
            AttemptOutcome::Terminal(ToolError::Protocol(
                "Non-JSON response: <html>gateway</html>".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_error_status_uses_message_field() {
        let (base, _server) = serve_once(
            http_response(
                "500 Internal Server Error",
                "application/json",
                r#"{"message":"workspace busy"}"#,
            ),
            Duration::ZERO,
        )
        .await;

        let outcome = HttpTransport::new()
            .send(&TransportRequest::post(format!("{}/api/editor/command", base), "tok"))
            .await;
        assert_eq!(
            outcome,
            AttemptOutcome::Retryable(ToolError::Transport("workspace busy".into()))
        );
    }

    #[tokio::test]
    async fn test_error_status_without_json_uses_default_message() {
        let (base, _server) = serve_once(
            http_response("404 Not Found", "text/plain", "not here"),
            Duration::ZERO,
        )
        .await;

        let outcome = HttpTransport::new()
            .send(&TransportRequest::post(format!("{}/missing", base), "tok"))
            .await;
        assert_eq!(
            outcome,
            AttemptOutcome::Retryable(ToolError::Transport("Request failed".into()))
        );
    }

    #[tokio::test]
    async fn test_timeout_is_retryable() {
        let (base, _server) = serve_once(
            http_response("200 OK", "application/json", "{}"),
            Duration::from_secs(2),
        )
        .await;

        let request = TransportRequest::post(format!("{}/api/editor/format", base), "tok")
            .with_timeout(Duration::from_millis(200));
        match HttpTransport::new().send(&request).await {
            AttemptOutcome::Retryable(ToolError::Transport(reason)) => {
                assert!(reason.contains("timed out"), "unexpected reason: {}", reason);
            }
            other => panic!("Expected retryable timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = HttpTransport::new()
            .send(&TransportRequest::post(format!("http://{}/api/editor/lint", addr), "tok"))
            .await;
        assert!(matches!(outcome, AttemptOutcome::Retryable(ToolError::Transport(_))));
    }

    #[test]
    fn test_non_json_preview_is_truncated() {
        let body = "x".repeat(500);
        match classify_response(true, &body) {
            AttemptOutcome::Terminal(ToolError::Protocol(reason)) => {
                assert_eq!(
                    reason.len(),
                    "Non-JSON response: ".len() + NON_JSON_PREVIEW_CHARS
                );
            }
            other => panic!("Expected terminal outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
