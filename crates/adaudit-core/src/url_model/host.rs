//! Public-suffix-aware host splitting.

/// A host split into an optional subdomain and its registrable root
/// (domain + public suffix, e.g. `example.co.uk`).
///
/// Comparisons in the audit always use [`HostParts::full`]; two hosts that
/// share a root but differ in subdomain are different hosts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostParts {
    pub subdomain: Option<String>,
    pub root: String,
}

impl HostParts {
    /// Splits a DNS name using the public suffix list.
    ///
    /// Hosts without a recognizable registrable domain (bare hostnames such
    /// as `localhost`, or a bare suffix such as `co.uk`) fall back to the raw
    /// lower-cased host as the root.
    pub fn from_domain(domain: &str) -> Option<Self> {
        let host = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return None;
        }
        let root = match psl::domain_str(&host) {
            Some(root) if !root.is_empty() => root.to_string(),
            _ => return Some(Self::literal(host)),
        };
        let subdomain = host
            .strip_suffix(root.as_str())
            .map(|s| s.trim_end_matches('.'))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(Self { subdomain, root })
    }

    /// A host taken as-is (IP literals, unrecognized names).
    pub fn literal(host: String) -> Self {
        Self {
            subdomain: None,
            root: host.to_ascii_lowercase(),
        }
    }

    /// Subdomain and root joined back into the full host.
    pub fn full(&self) -> String {
        match &self.subdomain {
            Some(sub) => format!("{}.{}", sub, self.root),
            None => self.root.clone(),
        }
    }
}
