// src/fetch/client.rs
// =============================================================================
// The Fetcher: one HTTP GET per call, with a timeout and a cancel signal.
//
// What it guarantees:
// - Exactly one request per call, no retries
// - Requests identify themselves (User-Agent) and ask for HTML first (Accept)
// - gzip/deflate bodies are decompressed by reqwest before we see them
// - The body is decoded using the charset the server declared (UTF-8 if none)
// - Non-2xx answers are HttpStatus errors, not Network errors
// - If the cancel token fires, we stop waiting and return Cancelled
//
// Rust concepts:
// - tokio::select!: wait on two futures, take whichever finishes first
// - Clone on Client: cheap, it shares one connection pool internally
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::FetchConfig;
use super::error::FetchError;
use crate::target::TargetUrl;

/// Accept header sent with every request.
pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self { client })
    }

    // Fetches `url` and returns the decoded body text
    //
    // The cancel branch is polled first, so a token that is already
    // cancelled never lets a request through.
    pub async fn fetch(
        &self,
        url: &TargetUrl,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.get(url) => result,
        };

        match &result {
            Ok(_) => {}
            Err(FetchError::Cancelled) => info!(url = %url, "fetch cancelled"),
            // The caller reports failures; this is only for tracing
            Err(e) => debug!(url = %url, error = %e, "fetch failed"),
        }

        result
    }

    async fn get(&self, url: &TargetUrl) -> Result<String, FetchError> {
        debug!(url = %url, "sending GET");

        let response = self.client.get(url.as_url().clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "received body");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use tokio::net::TcpListener;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::EnvFilter;

    use crate::target::normalize_input;

    fn fetcher_with_timeout(timeout: Duration) -> Fetcher {
        let config = FetchConfig {
            timeout,
            user_agent: "test-agent/1.0".to_string(),
        };
        Fetcher::new(&config).unwrap()
    }

    // A server that accepts connections and never answers
    async fn silent_server() -> TargetUrl {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        normalize_input(&format!("http://{}/", addr)).unwrap()
    }

    // Collects formatted log lines in memory
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    async fn logs_for_404(filter: &str) -> String {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&format!("{}/gone", server.url())).unwrap();
        let result = fetcher.fetch(&url, &CancellationToken::new()).await;
        assert!(matches!(result, Err(FetchError::HttpStatus(404))));

        logs.text()
    }

    #[tokio::test]
    async fn test_failures_stay_quiet_at_warn_level() {
        assert_eq!(logs_for_404("warn").await, "");
        assert!(logs_for_404("link_harvest=debug").await.contains("fetch failed"));
    }

    #[tokio::test]
    async fn test_fetch_success_sends_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("accept", ACCEPT_HTML)
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href='/x'>x</a>")
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&format!("{}/page", server.url())).unwrap();
        let body = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

        assert_eq!(body, "<a href='/x'>x</a>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_charset() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=iso-8859-1")
            .with_body(vec![b'c', b'a', b'f', 0xE9])
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&server.url()).unwrap();
        let body = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

        assert_eq!(body, "café");
    }

    #[tokio::test]
    async fn test_fetch_decompresses_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<a href='/z'>z</a>").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_header("content-encoding", "gzip")
            .with_body(compressed)
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&server.url()).unwrap();
        let body = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

        assert_eq!(body, "<a href='/z'>z</a>");
    }

    #[tokio::test]
    async fn test_fetch_decompresses_deflate() {
        // HTTP "deflate" is the zlib-wrapped format
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<a href='/d'>d</a>").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_header("content-encoding", "deflate")
            .with_body(compressed)
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&server.url()).unwrap();
        let body = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

        assert_eq!(body, "<a href='/d'>d</a>");
    }

    #[tokio::test]
    async fn test_fetch_404_is_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&format!("{}/missing", server.url())).unwrap();
        let result = fetcher.fetch(&url, &CancellationToken::new()).await;

        assert!(matches!(result, Err(FetchError::HttpStatus(404))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&format!("http://{}/", addr)).unwrap();
        let result = fetcher.fetch(&url, &CancellationToken::new()).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_slow_server_is_timeout() {
        let url = silent_server().await;
        let fetcher = fetcher_with_timeout(Duration::from_millis(200));

        let result = fetcher.fetch(&url, &CancellationToken::new()).await;

        assert!(matches!(result, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_succeeds() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<a href='/x'>x</a>")
            .create_async()
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_secs(5));
        let url = normalize_input(&server.url()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetcher.fetch(&url, &cancel).await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_returns_promptly() {
        let url = silent_server().await;
        let fetcher = fetcher_with_timeout(Duration::from_secs(30));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = fetcher.fetch(&url, &cancel).await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
