//! Request composition and dispatch.
//!
//! # Design
//! `RequestClient` pairs a `ClientConfig` with an optional `Transport`. Each
//! call is split into `build`, which turns the configuration plus a path into
//! an `HttpRequest` without touching the network, and the transport's
//! `execute`, which performs the round-trip and drains the response.
//!
//! Sending takes `&self` and mutation takes `&mut self`, so configuration
//! cannot change under an in-flight call on the same instance. The client is
//! `Send + Sync`; share it behind an `Arc` to issue requests from several
//! threads against a stable configuration. There is no internal locking.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};
use ureq::http::{HeaderName, HeaderValue};
use url::{form_urlencoded, Url};

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportFailure};

/// Synchronous HTTP client that composes requests from its configuration.
#[derive(Debug, Clone)]
pub struct RequestClient {
    config: ClientConfig,
    transport: Option<Transport>,
}

impl RequestClient {
    /// Client for `base_url` with no headers, body fields or query
    /// parameters, and a transport with the default 10 second timeout.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Some(Transport::default()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.config
            .headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn set_body_field(&mut self, key: &str, value: &str) -> &mut Self {
        self.config
            .body_fields
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_query_param(&mut self, key: &str, value: &str) -> &mut Self {
        self.config
            .query_params
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn transport(&self) -> Option<&Transport> {
        self.transport.as_ref()
    }

    /// Replace the transport handle. With `None`, every request fails with
    /// `ErrorKind::Configuration` and nothing is sent.
    pub fn set_transport(&mut self, transport: Option<Transport>) -> &mut Self {
        self.transport = transport;
        self
    }

    /// Effective timeout, or `None` when there is no transport.
    pub fn timeout(&self) -> Option<Duration> {
        self.transport.as_ref().map(Transport::timeout)
    }

    /// Change the timeout for requests issued from now on. Does nothing when
    /// the transport has been removed.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        match self.transport.as_mut() {
            Some(transport) => transport.set_timeout(timeout),
            None => debug!(?timeout, "no transport configured, timeout ignored"),
        }
        self
    }

    /// Compose the request for `method` on `path` from the current
    /// configuration.
    ///
    /// The body is the body-field mapping as a JSON object, or absent when the
    /// mapping is empty. The URL is `base_url` followed by `path` with no
    /// slash normalization, and query parameters are appended after any query
    /// already present in `path`. Configured headers overwrite defaults of the
    /// same name.
    pub fn build(&self, path: &str, method: HttpMethod) -> Result<HttpRequest, RequestError> {
        let body = if self.config.body_fields.is_empty() {
            None
        } else {
            let json = serde_json::to_string(&self.config.body_fields).map_err(|source| {
                RequestError::Serialization {
                    method,
                    path: path.to_string(),
                    source,
                }
            })?;
            Some(json)
        };

        let construction = |reason: String| RequestError::RequestConstruction {
            method,
            path: path.to_string(),
            reason,
        };

        // Parsed only for validation; the parser would resolve `.` and `..`
        // segments, and the request must go to the path exactly as given.
        let raw = format!("{}{}", self.config.base_url, path);
        let parsed = Url::parse(&raw).map_err(|e| construction(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(construction(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        let url = append_query(&raw, &self.config.query_params);

        let mut request = HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body,
        };
        if request.body.is_some() {
            request.set_header("content-type", "application/json");
        }
        for (name, value) in &self.config.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| construction(format!("header name {name:?}: {e}")))?;
            HeaderValue::from_str(value)
                .map_err(|e| construction(format!("header {name:?} value: {e}")))?;
            request.set_header(name, value);
        }

        Ok(request)
    }

    /// Build and execute `method` on `path`, returning the drained response.
    ///
    /// Any status code is a successful response; only failures to build,
    /// send or read the request are errors. Nothing is retried.
    pub fn send(&self, path: &str, method: HttpMethod) -> Result<HttpResponse, RequestError> {
        let Some(transport) = self.transport.as_ref() else {
            return Err(RequestError::NotConfigured {
                method,
                path: path.to_string(),
            });
        };

        let request = self.build(path, method)?;
        debug!(%method, url = %request.url, body = request.body.is_some(), "sending request");

        transport.execute(&request).map_err(|failure| {
            let path = path.to_string();
            let err = match failure {
                TransportFailure::Dispatch(source @ (ureq::Error::Http(_) | ureq::Error::BadUri(_))) => {
                    RequestError::RequestConstruction {
                        method,
                        path,
                        reason: source.to_string(),
                    }
                }
                TransportFailure::Dispatch(source) => RequestError::Transport {
                    method,
                    path,
                    source,
                },
                TransportFailure::Read(source) => RequestError::ResponseRead {
                    method,
                    path,
                    source,
                },
            };
            warn!(error = %err, "request failed");
            err
        })
    }

    pub fn get(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Get)
    }

    pub fn post(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Post)
    }

    pub fn patch(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Patch)
    }

    pub fn put(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Put)
    }

    pub fn delete(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Delete)
    }

    pub fn head(&self, path: &str) -> Result<HttpResponse, RequestError> {
        self.send(path, HttpMethod::Head)
    }
}

/// Append `params` form-encoded after any query already in `url`. The fragment
/// is dropped because it is never sent.
fn append_query(url: &str, params: &BTreeMap<String, String>) -> String {
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    if params.is_empty() {
        return url.to_string();
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    let separator = match url.find('?') {
        None => "?",
        Some(_) if url.ends_with('?') || url.ends_with('&') => "",
        Some(_) => "&",
    };
    format!("{url}{separator}{}", query.finish())
}
