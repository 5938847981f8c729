//! URL modeling for audit checks.
//!
//! Decomposes a URL into scheme, a public-suffix-aware host and a
//! multi-valued query map. Normalization never fails loudly: anything that
//! cannot be parsed yields `None`, and callers skip the structural check
//! that needed it.

mod host;
mod query;

pub use host::HostParts;
pub use query::QueryParams;

/// A URL reduced to the parts the audit rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Lower-cased scheme (`https`, `http`, ...).
    pub scheme: String,
    /// Host split into subdomain and registrable root. `None` for hostless URLs.
    pub host: Option<HostParts>,
    /// Query parameters, blank values and repeats preserved.
    pub params: QueryParams,
}

impl NormalizedUrl {
    /// Full lower-cased host (subdomain + root), if the URL has one.
    pub fn full_host(&self) -> Option<String> {
        self.host.as_ref().map(HostParts::full)
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

/// Normalizes `raw` into scheme, host and query parameters.
///
/// A scheme-less reference such as `www.example.com/x?utm_source=a` yields
/// an empty scheme, no host and its query parameters, so it still counts as
/// non-HTTPS and its UTM tagging is still checked. Anything else the `url`
/// crate rejects, or text containing whitespace, yields `None`.
///
/// # Examples
///
/// - `normalize("https://Shop.Example.co.uk/?a=1")` → host `shop.example.co.uk`
///   with root `example.co.uk`
/// - `normalize("not a url")` → `None`
pub fn normalize(raw: &str) -> Option<NormalizedUrl> {
    let raw = raw.trim();
    let parsed = match url::Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => return schemeless(raw),
        Err(_) => return None,
    };
    let host = match parsed.host() {
        Some(url::Host::Domain(d)) => HostParts::from_domain(d),
        Some(url::Host::Ipv4(ip)) => Some(HostParts::literal(ip.to_string())),
        Some(url::Host::Ipv6(ip)) => Some(HostParts::literal(ip.to_string())),
        None => None,
    };
    let params = parsed
        .query()
        .map(QueryParams::parse)
        .unwrap_or_default();
    Some(NormalizedUrl {
        scheme: parsed.scheme().to_ascii_lowercase(),
        host,
        params,
    })
}

fn schemeless(raw: &str) -> Option<NormalizedUrl> {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return None;
    }
    let without_fragment = raw.split_once('#').map(|(head, _)| head).unwrap_or(raw);
    let params = without_fragment
        .split_once('?')
        .map(|(_, query)| QueryParams::parse(query))
        .unwrap_or_default();
    Some(NormalizedUrl {
        scheme: String::new(),
        host: None,
        params,
    })
}

/// Full lower-cased host of `raw`, or `None` if it cannot be normalized or has no host.
pub fn host_of(raw: &str) -> Option<String> {
    normalize(raw).and_then(|n| n.full_host())
}

/// `raw` with everything from the first `?` removed.
pub fn strip_query(raw: &str) -> &str {
    raw.split_once('?').map(|(head, _)| head).unwrap_or(raw)
}
