//! Minimal synchronous HTTP request helper.
//!
//! # Overview
//! `RequestClient` composes a base URL, default headers, query parameters and
//! a JSON body from its `ClientConfig`, issues one blocking request, and
//! returns an `HttpResponse` with the status code, the body as text and every
//! response header.
//!
//! # Design
//! - Request construction (`RequestClient::build`) is separate from
//!   execution (`Transport`), so the composition rules are testable without
//!   a network.
//! - Non-2xx statuses are ordinary responses. Errors cover only failures to
//!   build, send or read a request, and each names the method and path.
//! - No retries, no streaming, no internal locking. Timeouts are enforced by
//!   the transport.
//!
//! ```no_run
//! use simplehttp::RequestClient;
//!
//! let mut client = RequestClient::new("https://api.example.com");
//! client
//!     .set_header("Authorization", "Bearer token")
//!     .set_query_param("page", "2");
//! let response = client.get("/items")?;
//! println!("{} {}", response.status, response.body);
//! # Ok::<(), simplehttp::RequestError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::RequestClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, RequestError};
pub use http::{HeaderMultimap, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, DEFAULT_TIMEOUT};
