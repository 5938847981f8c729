//! HTTP reachability probing of final URLs.
//!
//! Uses the curl crate (libcurl): a HEAD request with redirects followed,
//! retried as a GET when the server rejects the HEAD method itself. Probing is
//! strictly opt-in; nothing here runs unless the audit enables it.

mod batch;
mod parse;

pub use batch::{probe_all, ProbeResults, ProbeTarget};

use std::str;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::findings::{issue, Finding, Severity};

/// Probe settings (`[probe]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Probe every final URL. Off unless asked for.
    pub enabled: bool,
    /// Per-probe timeout in seconds; bounds the worst case for one slow endpoint.
    pub timeout_secs: u64,
    /// Maximum probes in flight at once.
    pub concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 5,
            concurrency: 8,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// What a probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered; `final_url` is the URL after redirects.
    Responded { status: u32, final_url: String },
    /// No usable response (DNS, connect, TLS, timeout, ...).
    Failed { reason: String },
}

impl ProbeOutcome {
    /// Finding for this outcome, if it is a failure or a status >= 400.
    pub fn finding(&self, ad_id: &str, url: &str) -> Option<Finding> {
        match self {
            ProbeOutcome::Failed { reason } => Some(Finding::new(
                ad_id,
                Severity::Error,
                issue::HTTP_FAILED,
                format!("{url} error={reason}"),
            )),
            ProbeOutcome::Responded { status, .. } if *status >= 400 => Some(Finding::new(
                ad_id,
                Severity::Error,
                issue::HTTP_NON_2XX,
                format!("{url} status={status}"),
            )),
            ProbeOutcome::Responded { .. } => None,
        }
    }
}

/// Performs a reachability check for one URL.
///
/// Implementations must be safe to call from several blocking-pool threads
/// at once.
pub trait Prober: Send + Sync {
    fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

/// Status codes that may mean "this method is not allowed" rather than
/// "this resource is broken".
const METHOD_REJECTED: [u32; 2] = [403, 405];

/// Redirect hops followed before a probe fails with a redirect-limit error.
pub const MAX_REDIRECTS: u32 = 10;

/// libcurl-backed prober.
#[derive(Debug, Clone, Default)]
pub struct CurlProber;

impl Prober for CurlProber {
    /// HEAD first, falling back to GET when the server blocks HEAD.
    ///
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let head = match request(url, timeout, Method::Head) {
            Ok(r) => r,
            Err(e) => return ProbeOutcome::Failed { reason: e.to_string() },
        };
        let response = if METHOD_REJECTED.contains(&head.status) && !head.headers.allows_head() {
            tracing::debug!(url, status = head.status, "HEAD rejected, retrying with GET");
            match request(url, timeout, Method::Get) {
                Ok(r) => r,
                Err(e) => return ProbeOutcome::Failed { reason: e.to_string() },
            }
        } else {
            head
        };
        ProbeOutcome::Responded {
            status: response.status,
            final_url: response.final_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Head,
    Get,
}

struct RawResponse {
    status: u32,
    final_url: String,
    headers: parse::ResponseHeaders,
}

fn request(url: &str, timeout: Duration, method: Method) -> Result<RawResponse, curl::Error> {
    let mut lines: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(method == Method::Head)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;
    easy.useragent(concat!("adaudit/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                lines.push(s.trim_end().to_string());
            }
            true
        })?;
        // GET bodies are read and dropped; only the status matters.
        transfer.write_function(|data| Ok(data.len()))?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let final_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(RawResponse {
        status,
        final_url,
        headers: parse::parse_headers(&lines),
    })
}
