use anyhow::{Context, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::CrawlConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid upstream url")]
    InvalidUrl,
    #[error("upstream connection failed")]
    Connection,
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream i/o error")]
    Io,
}

impl ClientError {
    /// Transport failures worth another attempt. Bad urls never are.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ClientError::InvalidUrl)
    }
}

/// Status and decoded body of one upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub code: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<UpstreamResponse, ClientError>> + Send>>;

pub type TransportFn = dyn Fn(&str) -> TransportFuture + Send + Sync;

/// GET-only client for the job site. The transport is injectable so tests can
/// serve synthetic pages without a network.
#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<TransportFn>,
    pub req_timeout: Duration,
    pub retries: usize,
    pub retry_backoff: Duration,
}

impl UpstreamClient {
    pub fn new_with_transport(transport: Arc<TransportFn>) -> Self {
        Self {
            transport,
            req_timeout: Duration::from_secs(15),
            retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }

    /// Client over a synthetic transport: no retries, tiny backoff.
    pub fn new_test(transport: Arc<TransportFn>) -> Self {
        Self {
            retries: 0,
            retry_backoff: Duration::from_millis(1),
            ..Self::new_with_transport(transport)
        }
    }

    /// Build the production client on top of reqwest with a browser-like identity.
    pub fn from_config(cfg: &CrawlConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .default_headers(headers)
            .timeout(cfg.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("failed to build upstream http client")?;

        let transport: Arc<TransportFn> = Arc::new(move |url: &str| -> TransportFuture {
            let http = http.clone();
            let url = url.to_string();
            Box::pin(async move {
                let resp = http.get(&url).send().await.map_err(classify_reqwest)?;
                let code = resp.status().as_u16();
                let body = resp.text().await.map_err(classify_reqwest)?;
                Ok::<_, ClientError>(UpstreamResponse { code, body })
            })
        });

        Ok(Self {
            transport,
            req_timeout: cfg.request_timeout,
            retries: cfg.retry_max,
            retry_backoff: cfg.retry_base_backoff,
        })
    }

    /// Fetch `url`, retrying only transient transport failures. Any HTTP
    /// answer, including 4xx/5xx, is returned as-is on the first attempt.
    pub async fn fetch_with_retries(&self, url: &str) -> Result<UpstreamResponse, ClientError> {
        let mut last_err = None;
        for attempt in 0..=self.retries {
            match self.fetch_once(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    if attempt < self.retries {
                        let delay = compute_backoff(self.retry_backoff, attempt as u32 + 1);
                        warn!(
                            target: "scoutd::crawler",
                            "upstream attempt {}/{} failed: {} ; retrying in {:?}",
                            attempt + 1,
                            self.retries + 1,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(ClientError::Connection))
    }

    async fn fetch_once(&self, url: &str) -> Result<UpstreamResponse, ClientError> {
        let parsed = url::Url::parse(url).map_err(|_| ClientError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl);
        }
        debug!(target: "scoutd::crawler", "GET {}", url);
        let fut = (self.transport)(url);
        let resp = timeout(self.req_timeout, fut)
            .await
            .map_err(|_| ClientError::Timeout)??;
        debug!(target: "scoutd::crawler", "status={} bytes={} url={}", resp.code, resp.body.len(), url);
        Ok(resp)
    }
}

fn classify_reqwest(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_connect() {
        ClientError::Connection
    } else if err.is_builder() {
        ClientError::InvalidUrl
    } else {
        ClientError::Io
    }
}

/// Exponential backoff with jitter, capped at 10s.
fn compute_backoff(base: Duration, attempt: u32) -> Duration {
    let base_ms = base.as_millis() as u64;
    let mut factor = 1u64;
    for _ in 1..attempt {
        factor = factor.saturating_mul(2);
    }
    let capped = base_ms.saturating_mul(factor).min(10_000);
    let jitter = fastrand::u64(0..(base_ms / 2 + 1));
    Duration::from_millis(capped.saturating_add(jitter))
}
