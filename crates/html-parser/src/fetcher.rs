use std::error::Error as StdError;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Could not resolve {0}, check that the domain exists")]
    NameResolution(String),
    #[error("Connection refused by {0}, the server may be down")]
    ConnectionRefused(String),
    #[error("Request to {0} timed out")]
    Timeout(String),
    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("Failed to fetch {url}: {reason}")]
    Other { url: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_redirects: 5,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub final_url: Url,
    pub status: u16,
    pub html: String,
    pub elapsed: Duration,
}

/// Prefixes `https://` when the scheme is missing and rejects anything that is
/// not http(s).
pub fn normalize_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: input.to_string(),
            reason: "URL is empty".to_string(),
        });
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = Url::parse(&candidate).map_err(|e| FetchError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: input.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .default_headers(headers)
            .timeout(options.timeout)
            .redirect(Policy::limited(options.max_redirects))
            .build()
            .map_err(|e| FetchError::Other {
                url: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        info!(url = %url, "fetching page");
        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;
        let elapsed = start.elapsed();
        debug!(
            url = %final_url,
            status = status.as_u16(),
            bytes = html.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "page fetched"
        );

        Ok(FetchedPage {
            url: url.clone(),
            final_url,
            status: status.as_u16(),
            html,
            elapsed,
        })
    }

    /// Round-trip time until the response head arrives.
    pub async fn measure_latency(&self, url: &Url, timeout: Duration) -> Result<Duration, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(start.elapsed())
    }

    /// Body of `url` when it answers 2xx within `timeout`, `None` for anything else.
    pub async fn fetch_optional(&self, url: &Url, timeout: Duration) -> Option<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!(url = %url, status = response.status().as_u16(), "optional resource missing");
            return None;
        }
        response.text().await.ok()
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout(url.to_string());
    }
    if let Some(status) = error.status() {
        return FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    classify_chain(url, error_chain(&error).to_lowercase())
}

/// Maps a lowercased error chain onto the fetch error taxonomy.
fn classify_chain(url: &Url, chain: String) -> FetchError {
    let host = url.host_str().unwrap_or_default().to_string();
    if chain.contains("dns error")
        || chain.contains("failed to lookup address")
        || chain.contains("name or service not known")
        || chain.contains("no such host")
    {
        FetchError::NameResolution(host)
    } else if chain.contains("connection refused") {
        FetchError::ConnectionRefused(host)
    } else if chain.contains("timed out") {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Other {
            url: url.to_string(),
            reason: chain,
        }
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Body, Response, Server, StatusCode};
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    #[test]
    fn test_normalize_url_adds_scheme() {
        let url = normalize_url("example.com/about").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");

        let url = normalize_url("  http://example.com ").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_normalize_url_rejects_bad_input() {
        assert!(matches!(
            normalize_url(""),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_url("ftp://example.com"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let addr = start_test_server().await;
        let fetcher = PageFetcher::new(&FetchOptions::default()).unwrap();
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();

        let page = fetcher.fetch(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert!(page.html.contains("<title>Test Page</title>"));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let addr = start_test_server().await;
        let fetcher = PageFetcher::new(&FetchOptions::default()).unwrap();
        let url = Url::parse(&format!("http://{}/old", addr)).unwrap();

        let page = fetcher.fetch(&url).await.unwrap();
        assert_eq!(page.final_url.path(), "/");
        assert_eq!(page.url.path(), "/old");
    }

    #[tokio::test]
    async fn test_fetch_http_status_error() {
        let addr = start_test_server().await;
        let fetcher = PageFetcher::new(&FetchOptions::default()).unwrap();
        let url = Url::parse(&format!("http://{}/missing", addr)).unwrap();

        match fetcher.fetch(&url).await {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = PageFetcher::new(&FetchOptions::default()).unwrap();
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let error = fetcher.fetch(&url).await.unwrap_err();
        assert!(
            matches!(error, FetchError::ConnectionRefused(_)),
            "unexpected error {:?}",
            error
        );
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let addr = start_test_server().await;
        let options = FetchOptions {
            timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let fetcher = PageFetcher::new(&options).unwrap();
        let url = Url::parse(&format!("http://{}/slow", addr)).unwrap();

        let error = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(error, FetchError::Timeout(_)), "unexpected error {:?}", error);
    }

    #[test]
    fn test_classify_chain() {
        let url = Url::parse("https://nowhere.invalid/page").unwrap();
        let chain = "error sending request for url (https://nowhere.invalid/page): error trying to connect: dns error: failed to lookup address information: name or service not known";
        match classify_chain(&url, chain.to_string()) {
            FetchError::NameResolution(host) => assert_eq!(host, "nowhere.invalid"),
            other => panic!("expected NameResolution, got {:?}", other),
        }
        assert!(matches!(
            classify_chain(&url, "tcp connect error: connection refused".to_string()),
            FetchError::ConnectionRefused(_)
        ));
        assert!(matches!(
            classify_chain(&url, "operation timed out".to_string()),
            FetchError::Timeout(_)
        ));
        assert!(matches!(
            classify_chain(&url, "invalid certificate".to_string()),
            FetchError::Other { .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_optional() {
        let addr = start_test_server().await;
        let fetcher = PageFetcher::new(&FetchOptions::default()).unwrap();
        let timeout = Duration::from_secs(5);

        let found = Url::parse(&format!("http://{}/", addr)).unwrap();
        assert!(fetcher.fetch_optional(&found, timeout).await.is_some());

        let missing = Url::parse(&format!("http://{}/missing", addr)).unwrap();
        assert!(fetcher.fetch_optional(&missing, timeout).await.is_none());
    }

    async fn start_test_server() -> SocketAddr {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let make_svc = make_service_fn(move |_conn| async move {
            Ok::<_, Infallible>(service_fn(move |req| async move {
                match req.uri().path() {
                    "/" => Ok::<_, Infallible>(Response::new(Body::from(
                        "<html><head><title>Test Page</title></head><body></body></html>",
                    ))),
                    "/slow" => {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                        Ok(Response::new(Body::from("<html></html>")))
                    }
                    "/old" => Ok(Response::builder()
                        .status(StatusCode::MOVED_PERMANENTLY)
                        .header("Location", "/")
                        .body(Body::empty())
                        .unwrap()),
                    _ => Ok(Response::builder()
                        .status(StatusCode::NOT_FOUND)
                        .body(Body::from("404"))
                        .unwrap()),
                }
            }))
        });

        tokio::spawn(async move {
            Server::from_tcp(listener.into_std().unwrap())
                .unwrap()
                .serve(make_svc)
                .await
                .unwrap();
        });

        addr
    }
}
