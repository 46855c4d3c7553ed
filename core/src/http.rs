//! HTTP data types shared by the client and its transport.
//!
//! # Design
//! Requests and responses are described as plain data. `RequestClient::build`
//! produces an `HttpRequest` without touching the network; the `Transport`
//! executes it and normalizes the reply into an `HttpResponse`. Keeping the
//! construction step I/O-free makes it deterministic and easy to test.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved across
//! threads or stored without lifetime concerns.

use std::collections::BTreeMap;
use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    /// The upper-case method token as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP request described as plain data.
///
/// `url` already carries the query string. `headers` holds at most one entry
/// per (case-insensitive) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing entry with the same name.
    pub(crate) fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}

/// Ordered multimap of response headers.
///
/// Names are stored lower-cased, so lookups are case-insensitive. Values for
/// a repeated name keep the order in which they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultimap {
    entries: BTreeMap<String, Vec<String>>,
}

impl HeaderMultimap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`, after any values already present.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// First value received for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Every value received for `name`, in arrival order. Empty if absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterate over `(name, values)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMultimap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderMultimap::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value);
        }
        headers
    }
}

/// A normalized HTTP response: status, every header, and the whole body as
/// text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMultimap,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens_are_upper_case() {
        let tokens: Vec<String> = [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Patch,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Head,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(tokens, ["GET", "POST", "PATCH", "PUT", "DELETE", "HEAD"]);
    }

    #[test]
    fn multimap_preserves_duplicate_values_in_order() {
        let mut headers = HeaderMultimap::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");
        headers.append("Content-Type", "text/plain");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_all("SET-COOKIE"), ["a=1", "b=2"]);
        assert_eq!(headers.get("set-cookie"), Some("a=1"));
        assert_eq!(headers.get("content-type"), Some("text/plain"));
    }

    #[test]
    fn multimap_missing_name() {
        let headers: HeaderMultimap = [("x-one", "1")].into_iter().collect();
        assert!(headers.contains("X-One"));
        assert!(!headers.contains("x-two"));
        assert!(headers.get("x-two").is_none());
        assert!(headers.get_all("x-two").is_empty());
    }

    #[test]
    fn request_set_header_replaces_case_insensitively() {
        let mut req = HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost/".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: None,
        };
        req.set_header("Content-Type", "text/plain");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("CONTENT-TYPE"), Some("text/plain"));
    }
}
