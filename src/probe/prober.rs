//! Provider availability prober
//!
//! Sends one minimal completion request to an LLM endpoint and classifies the
//! outcome. Every path, including validation failures and timeouts, ends in a
//! [`ProbeResult`]; nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use preflight::probe::{ProbeRequest, Prober};
//!
//! # async fn example() {
//! let request = ProbeRequest::new("https://api.openai.com/v1")
//!     .with_api_key("sk-...")
//!     .with_model("gpt-4o-mini");
//!
//! let result = Prober::new().probe(&request).await;
//! println!("{}: {}", result.status, result.message);
//! # }
//! ```

use super::types::{ProbeError, ProbeRequest, ProbeResult};
use super::wire::{HttpProbe, WireFormats};
use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Deadline for one probe, measured from dispatch
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// A probe request with a display name, e.g. one configured provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedProbe {
    pub name: String,
    pub request: ProbeRequest,
}

/// Outcome of a named probe, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub name: String,
    pub wire_format: String,
    pub result: ProbeResult,
    pub elapsed_ms: u64,
}

/// Stateless prober. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Prober {
    http_client: Client,
    formats: WireFormats,
    timeout: Duration,
}

impl Prober {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            formats: WireFormats::default(),
            timeout,
        }
    }

    /// Replaces the wire-format registry
    pub fn with_formats(mut self, formats: WireFormats) -> Self {
        self.formats = formats;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes the endpoint. Never fails.
    pub async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let result = ProbeResult::from(self.check(request).await);
        if result.status {
            info!("Probe of {} succeeded", request.base_url);
        } else {
            warn!("Probe of {} failed: {}", request.base_url, result.message);
        }
        result
    }

    /// Same checks as [`Prober::probe`], keeping the failure kind
    pub async fn check(&self, request: &ProbeRequest) -> Result<(), ProbeError> {
        let base_url = request.base_url().ok_or(ProbeError::MissingBaseUrl)?;
        let format = self
            .formats
            .select(request.provider_hint.as_deref());
        let http = format.build_request(base_url, request);

        debug!(
            wire_format = format.name(),
            url = %http.url,
            "Dispatching probe request"
        );

        let (status, body) = self.exchange(http).await?;

        if !status.is_success() {
            return Err(ProbeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        format.validate_response(&body)
    }

    /// Probes every entry concurrently; reports keep the input order
    pub async fn probe_all(&self, probes: &[NamedProbe]) -> Vec<ProbeReport> {
        join_all(probes.iter().map(|probe| self.report(probe))).await
    }

    async fn report(&self, probe: &NamedProbe) -> ProbeReport {
        let wire_format = self
            .formats
            .select(probe.request.provider_hint.as_deref())
            .name()
            .to_string();
        let start = Instant::now();
        let result = self.probe(&probe.request).await;

        ProbeReport {
            name: probe.name.clone(),
            wire_format,
            result,
            elapsed_ms: saturating_millis(start.elapsed()),
        }
    }

    /// One request under a deadline. Dropping the future on timeout cancels
    /// the in-flight request; the deadline goes away with it on every path.
    async fn exchange(&self, http: HttpProbe) -> Result<(StatusCode, String), ProbeError> {
        let mut builder = self.http_client.post(&http.url).json(&http.body);
        if !http.query.is_empty() {
            builder = builder.query(&http.query);
        }
        if let Some(token) = &http.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let send = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = if status.is_success() {
                response.text().await?
            } else {
                response.text().await.unwrap_or_default()
            };
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(exchange)) => Ok(exchange),
            Ok(Err(e)) if e.is_timeout() => Err(self.timed_out()),
            Ok(Err(e)) => Err(ProbeError::Network {
                message: error_chain(&e),
            }),
            Err(_) => Err(self.timed_out()),
        }
    }

    fn timed_out(&self) -> ProbeError {
        ProbeError::Timeout {
            seconds: self.timeout.as_secs_f64(),
        }
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Prober {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prober")
            .field("formats", &self.formats)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// reqwest's top-level message hides the cause (refused, DNS, TLS)
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Probes one endpoint with the default timeout and wire formats
pub async fn probe(
    base_url: &str,
    api_key: &str,
    model: Option<&str>,
    provider_hint: Option<&str>,
) -> ProbeResult {
    let request = ProbeRequest {
        base_url: base_url.to_string(),
        api_key: api_key.to_string(),
        model: model.map(str::to_string),
        provider_hint: provider_hint.map(str::to_string),
    };
    Prober::new().probe(&request).await
}
