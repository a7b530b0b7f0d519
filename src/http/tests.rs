use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::client::{ClientSettings, build_client};
use super::dispatcher::dispatch;
use super::rate::throttle_period;
use super::request::RequestTemplate;
use super::worker::{error_text, execute};
use crate::args::HttpMethod;
use crate::source::RequestSource;

struct VecSource {
    bodies: std::vec::IntoIter<String>,
}

impl VecSource {
    fn with_lines(count: usize) -> Self {
        let bodies: Vec<String> = (0..count).map(|idx| format!("line-{}", idx)).collect();
        Self {
            bodies: bodies.into_iter(),
        }
    }
}

#[async_trait]
impl RequestSource for VecSource {
    async fn next_body(&mut self) -> Option<String> {
        self.bodies.next()
    }
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn run_paused_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn template(url: &str) -> Result<Arc<RequestTemplate>, String> {
    RequestTemplate::new(HttpMethod::Post, url, &[], None)
        .map(Arc::new)
        .map_err(|err| format!("template: {}", err))
}

/// Answers each connection with a fixed body and reports the raw request
/// head it saw.
async fn spawn_server(
    body: &'static str,
) -> Result<(SocketAddr, tokio::sync::mpsc::UnboundedReceiver<String>), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local_addr: {}", err))?;
    let (head_tx, head_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let head_tx = head_tx.clone();
            tokio::spawn(async move {
                if let Ok(head) = serve_one(stream, body).await {
                    drop(head_tx.send(head));
                }
            });
        }
    });
    Ok((addr, head_rx))
}

async fn serve_one(mut stream: TcpStream, body: &str) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(String::from_utf8_lossy(&buf).into_owned());
        }
        buf.extend_from_slice(chunk.get(..read).unwrap_or_default());
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos.saturating_add(4);
        }
    };
    let head = String::from_utf8_lossy(buf.get(..head_end).unwrap_or_default()).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end.saturating_add(content_length) {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buf.extend_from_slice(chunk.get(..read).unwrap_or_default());
    }
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(head)
}

#[test]
fn dispatch_stops_at_request_cap() -> Result<(), String> {
    run_async_test(async {
        let template = template("http://127.0.0.1:9/")?;
        let (queue_tx, queue_rx) = flume::bounded(16);
        let mut source = VecSource::with_lines(10);

        let dispatched = dispatch(&mut source, &template, queue_tx, 5, 0).await;
        if dispatched != 5 {
            return Err(format!("Expected 5 dispatched, got {}", dispatched));
        }
        let queued: Vec<String> = queue_rx.drain().map(|job| job.body).collect();
        if queued.len() != 5 {
            return Err(format!("Expected 5 queued jobs, got {}", queued.len()));
        }
        if queued.first().map(String::as_str) != Some("line-0") {
            return Err(format!("Unexpected first body: {:?}", queued.first()));
        }
        if source.next_body().await.as_deref() != Some("line-5") {
            return Err("Dispatcher pulled more bodies than it submitted".to_owned());
        }
        Ok(())
    })
}

#[test]
fn dispatch_runs_until_source_exhausted() -> Result<(), String> {
    run_async_test(async {
        let template = template("http://127.0.0.1:9/")?;
        let (queue_tx, queue_rx) = flume::bounded(16);
        let mut source = VecSource::with_lines(3);

        let dispatched = dispatch(&mut source, &template, queue_tx, 0, 0).await;
        if dispatched != 3 {
            return Err(format!("Expected 3 dispatched, got {}", dispatched));
        }
        if !queue_rx.is_disconnected() {
            return Err("Expected queue to be closed after dispatch".to_owned());
        }
        Ok(())
    })
}

#[test]
fn dispatch_stops_when_workers_are_gone() -> Result<(), String> {
    run_async_test(async {
        let template = template("http://127.0.0.1:9/")?;
        let (queue_tx, queue_rx) = flume::bounded(1);
        drop(queue_rx);
        let mut source = VecSource::with_lines(3);

        let dispatched = dispatch(&mut source, &template, queue_tx, 0, 0).await;
        if dispatched != 0 {
            return Err(format!("Expected nothing dispatched, got {}", dispatched));
        }
        Ok(())
    })
}

#[test]
fn dispatch_spaces_submissions_by_rate() -> Result<(), String> {
    run_paused_test(async {
        let template = template("http://127.0.0.1:9/")?;
        let (queue_tx, queue_rx) = flume::bounded(64);
        let mut source = VecSource::with_lines(20);

        let start = tokio::time::Instant::now();
        let dispatched = dispatch(&mut source, &template, queue_tx, 0, 100).await;
        let elapsed = start.elapsed();
        drop(queue_rx);

        if dispatched != 20 {
            return Err(format!("Expected 20 dispatched, got {}", dispatched));
        }
        let mean = elapsed.checked_div(20).unwrap_or_default();
        if mean < Duration::from_millis(9) || mean > Duration::from_millis(11) {
            return Err(format!("Expected ~10ms spacing, got {:?}", mean));
        }
        Ok(())
    })
}

#[test]
fn throttle_period_from_rate() -> Result<(), String> {
    if throttle_period(0).is_some() {
        return Err("Expected no throttle for rate 0".to_owned());
    }
    if throttle_period(100) != Some(Duration::from_millis(10)) {
        return Err(format!("Unexpected period: {:?}", throttle_period(100)));
    }
    if throttle_period(5_000_000) != Some(Duration::from_micros(1)) {
        return Err("Expected period to clamp at 1µs".to_owned());
    }
    Ok(())
}

#[test]
fn template_adds_default_user_agent() -> Result<(), String> {
    let template = RequestTemplate::new(HttpMethod::Get, "http://localhost:8080/a", &[], None)
        .map_err(|err| format!("template: {}", err))?;
    let agent = template
        .headers()
        .get(reqwest::header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    if agent != Some(crate::args::DEFAULT_USER_AGENT) {
        return Err(format!("Unexpected user agent: {:?}", agent));
    }

    let custom = vec![("User-Agent".to_owned(), "custom/1".to_owned())];
    let custom_template =
        RequestTemplate::new(HttpMethod::Get, "http://localhost:8080/a", &custom, None)
            .map_err(|err| format!("template: {}", err))?;
    let agents: Vec<_> = custom_template
        .headers()
        .get_all(reqwest::header::USER_AGENT)
        .iter()
        .collect();
    let first = agents.first().map(|value| value.as_bytes());
    if agents.len() != 1 || first != Some(b"custom/1".as_slice()) {
        return Err(format!("Unexpected user agents: {:?}", agents));
    }
    Ok(())
}

#[test]
fn template_rejects_bad_targets() -> Result<(), String> {
    for url in ["not a url", "ftp://localhost/file", "http://"] {
        if RequestTemplate::new(HttpMethod::Get, url, &[], None).is_ok() {
            return Err(format!("Expected '{}' to be rejected", url));
        }
    }
    let bad_header = vec![("Bad Header".to_owned(), "x".to_owned())];
    if RequestTemplate::new(HttpMethod::Get, "http://localhost/", &bad_header, None).is_ok() {
        return Err("Expected invalid header name to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn invalid_proxy_fails_client_build() -> Result<(), String> {
    let settings = ClientSettings {
        proxy: Some("://nope".to_owned()),
        ..ClientSettings::default()
    };
    if build_client(&settings).is_ok() {
        return Err("Expected invalid proxy to fail".to_owned());
    }
    Ok(())
}

#[test]
fn execute_records_status_and_size() -> Result<(), String> {
    run_async_test(async {
        let (addr, mut heads) = spawn_server("hello").await?;
        let template = template(&format!("http://{}/submit", addr))?;
        let client = build_client(&ClientSettings::default())
            .map_err(|err| format!("client: {}", err))?;

        let result = execute(&client, &template.request("{\"id\":1}".to_owned())).await;
        if result.error.is_some() {
            return Err(format!("Unexpected error: {:?}", result.error));
        }
        if result.status_code != 200 || result.content_length != 5 {
            return Err(format!("Unexpected result: {:?}", result));
        }
        let head = heads.recv().await.ok_or("missing request head")?;
        if !head.starts_with("POST /submit") {
            return Err(format!("Unexpected request head: {}", head));
        }
        Ok(())
    })
}

#[test]
fn execute_reports_connection_failure() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| format!("bind: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr: {}", err))?;
        drop(listener);

        let template = template(&format!("http://{}/", addr))?;
        let client = build_client(&ClientSettings::default())
            .map_err(|err| format!("client: {}", err))?;
        let result = execute(&client, &template.request(String::new())).await;
        if result.status_code != 0 || result.content_length != 0 {
            return Err(format!("Unexpected failure result: {:?}", result));
        }
        if result.error.as_deref().is_none_or(str::is_empty) {
            return Err(format!("Expected error text, got {:?}", result.error));
        }
        Ok(())
    })
}

#[test]
fn host_override_only_replaces_host_header() -> Result<(), String> {
    run_async_test(async {
        let (addr, mut heads) = spawn_server("ok").await?;
        let url = format!("http://{}/", addr);
        let headers = vec![("Host".to_owned(), "ignored.example.test".to_owned())];
        let template =
            RequestTemplate::new(HttpMethod::Get, &url, &headers, Some(" api.example.test "))
                .map(Arc::new)
                .map_err(|err| format!("template: {}", err))?;
        if template.url().as_str() != url {
            return Err(format!("URL must keep the original target: {}", template.url()));
        }

        let client = build_client(&ClientSettings::default())
            .map_err(|err| format!("client: {}", err))?;
        let result = execute(&client, &template.request(String::new())).await;
        if result.status_code != 200 {
            return Err(format!("Unexpected result: {:?}", result));
        }
        let head = heads.recv().await.ok_or("missing request head")?.to_ascii_lowercase();
        let hosts: Vec<&str> = head
            .lines()
            .filter(|line| line.starts_with("host:"))
            .collect();
        if hosts != ["host: api.example.test"] {
            return Err(format!("Unexpected Host headers {:?} in: {}", hosts, head));
        }
        Ok(())
    })
}

#[test]
fn blank_host_override_is_rejected() -> Result<(), String> {
    for host in ["", "   ", "bad\nhost"] {
        if RequestTemplate::new(HttpMethod::Get, "http://localhost/", &[], Some(host)).is_ok() {
            return Err(format!("Expected host override {:?} to be rejected", host));
        }
    }
    Ok(())
}

/// Reads one TLS record (the ClientHello) from a fresh connection.
async fn read_client_hello(listener: TcpListener) -> std::io::Result<Vec<u8>> {
    let (mut stream, _) = listener.accept().await?;
    let mut hello = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let record_len = match (hello.get(3), hello.get(4)) {
            (Some(high), Some(low)) => usize::from(u16::from_be_bytes([*high, *low])),
            (None, _) | (_, None) => usize::MAX,
        };
        if hello.len() >= record_len.saturating_add(5) {
            return Ok(hello);
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(hello);
        }
        hello.extend_from_slice(chunk.get(..read).unwrap_or_default());
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn host_override_keeps_original_tls_server_name() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| format!("bind: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr: {}", err))?;
        let capture = tokio::spawn(read_client_hello(listener));

        let url = format!("https://localhost:{}/", addr.port());
        let template = RequestTemplate::new(HttpMethod::Get, &url, &[], Some("api.example.test"))
            .map(Arc::new)
            .map_err(|err| format!("template: {}", err))?;
        let settings = ClientSettings {
            insecure: true,
            ..ClientSettings::default()
        };
        let client = build_client(&settings).map_err(|err| format!("client: {}", err))?;
        let result = execute(&client, &template.request(String::new())).await;
        if result.error.is_none() {
            return Err(format!("Expected a failed handshake, got {:?}", result));
        }

        let hello = capture
            .await
            .map_err(|err| format!("capture task: {}", err))?
            .map_err(|err| format!("capture read: {}", err))?;
        if !contains_bytes(&hello, b"localhost") {
            return Err("ClientHello must name the original host".to_owned());
        }
        if contains_bytes(&hello, b"api.example.test") {
            return Err("ClientHello must not name the Host override".to_owned());
        }
        Ok(())
    })
}

#[test]
fn error_text_joins_source_chain() -> Result<(), String> {
    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    let err = Outer(std::io::Error::other("inner"));
    let text = error_text(&err);
    if text != "outer: inner" {
        return Err(format!("Unexpected text: {}", text));
    }
    Ok(())
}
