//! Request configuration carried by a `RequestClient`.
//!
//! # Design
//! Everything the client composes into a request lives here as plain data.
//! Body fields and query parameters use `BTreeMap` so their encoding order is
//! sorted and repeatable from call to call. Header order does not matter
//! because names are unique, so a `HashMap` is enough there.
//!
//! The body is always a flat JSON object of string values. Nested JSON,
//! non-string values, form encoding and multipart are not supported.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Base URL plus the headers, body fields and query parameters applied to
/// every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix of every request URL. Joined to the path verbatim, so slashes
    /// are the caller's concern.
    pub base_url: String,

    /// Sent on every request. A later insert for the same name wins.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Encoded as a JSON object body when non-empty. No body otherwise.
    #[serde(default)]
    pub body_fields: BTreeMap<String, String>,

    /// Appended to the query string of every request.
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}
