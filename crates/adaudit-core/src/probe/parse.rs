//! Parse HTTP response header lines collected during a probe.

/// Headers of the final response, after any redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHeaders {
    /// `Allow` value if present (methods the resource accepts).
    pub allow: Option<String>,
}

impl ResponseHeaders {
    /// True if the server's `Allow` header lists HEAD.
    pub fn allows_head(&self) -> bool {
        self.allow
            .as_deref()
            .map(|a| a.to_ascii_uppercase().contains("HEAD"))
            .unwrap_or(false)
    }
}

/// Parse collected header lines into the headers of the last response.
///
/// With redirects followed, curl reports one header block per hop; each
/// block starts with an `HTTP/` status line, so parsing restarts there.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line
            .get(..5)
            .map(|p| p.eq_ignore_ascii_case("HTTP/"))
            .unwrap_or(false)
        {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("allow") {
                out.allow = Some(value.to_string());
            }
        }
    }

    out
}
