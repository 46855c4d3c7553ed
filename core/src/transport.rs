//! Blocking transport that executes an `HttpRequest` over the network.
//!
//! # Design
//! Wraps a `ureq::Agent`, which owns connection reuse, TLS and timeout
//! enforcement. The agent is configured to return 4xx/5xx responses as data
//! so status interpretation stays with the caller. Agent configuration is
//! immutable, so changing the timeout rebuilds the agent; requests already
//! issued keep the agent they started with.

use std::fmt;
use std::time::Duration;

use tracing::debug;
use ureq::http::Response;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::http::{HeaderMultimap, HttpMethod, HttpRequest, HttpResponse};

/// Timeout applied by `Transport::default` and `RequestClient::new`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTS: u32 = 10;

/// Why `Transport::execute` failed. The client adds method and path context.
#[derive(Debug)]
pub(crate) enum TransportFailure {
    /// The request never produced a response.
    Dispatch(ureq::Error),
    /// A response arrived but its body could not be read.
    Read(ureq::Error),
}

/// The transport handle owned by a `RequestClient`.
#[derive(Clone)]
pub struct Transport {
    agent: Agent,
    timeout: Duration,
}

impl Transport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replace the timeout used by requests issued from now on.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.agent = build_agent(timeout);
        self.timeout = timeout;
    }

    /// Send `request`, then drain the whole response body into memory.
    ///
    /// The response is dropped before returning on every path, which releases
    /// its connection back to the agent.
    pub(crate) fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let mut response = self.dispatch(request).map_err(TransportFailure::Dispatch)?;

        let status = response.status().as_u16();
        let headers: HeaderMultimap = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(TransportFailure::Read)?;

        debug!(
            method = %request.method,
            url = %request.url,
            status,
            bytes = bytes.len(),
            "response received"
        );

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<Response<Body>, ureq::Error> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);
        let headers = &request.headers;

        match request.method {
            HttpMethod::Get => send_without_body(with_headers(self.agent.get(url), headers), body),
            HttpMethod::Delete => {
                send_without_body(with_headers(self.agent.delete(url), headers), body)
            }
            HttpMethod::Head => send_without_body(with_headers(self.agent.head(url), headers), body),
            HttpMethod::Post => send_with_body(with_headers(self.agent.post(url), headers), body),
            HttpMethod::Put => send_with_body(with_headers(self.agent.put(url), headers), body),
            HttpMethod::Patch => send_with_body(with_headers(self.agent.patch(url), headers), body),
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .max_redirects(MAX_REDIRECTS)
        .build()
        .new_agent()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

// GET, HEAD and DELETE carry a body only when the caller configured one.
fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&[u8]>,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.force_send_body().send(bytes),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    body: Option<&[u8]>,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}
