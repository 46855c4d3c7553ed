use std::{collections::BTreeMap, time::Duration};

use axum::{
    extract::{RawQuery, Request},
    http::{
        header::{AUTHORIZATION, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

/// Token accepted by `/protected`.
pub const GOOD_TOKEN: &str = "Bearer goodtoken";

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub query: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/", any(empty))
        .route("/echo", any(echo))
        .route("/header", get(request_headers))
        .route("/protected", get(protected))
        .route("/query-parameter", get(query_parameter))
        .route("/bad-request", get(bad_request))
        .route("/too-many", get(too_many))
        .route("/unlimited-redirect", get(unlimited_redirect))
        .route("/multi-value", get(multi_value))
        .route("/slow", get(slow))
        .layer(middleware::from_fn(tag_method))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Every response carries a `method` header naming the request method.
async fn tag_method(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(method.as_str()) {
        response.headers_mut().insert("method", value);
    }
    response
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn echo(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        headers: header_map(&headers),
        query,
        body,
    })
}

async fn request_headers(headers: HeaderMap) -> Json<BTreeMap<String, Vec<String>>> {
    Json(header_map(&headers))
}

async fn protected(headers: HeaderMap) -> (StatusCode, &'static str) {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(GOOD_TOKEN) => (StatusCode::OK, "good"),
        _ => (StatusCode::UNAUTHORIZED, "bad"),
    }
}

async fn query_parameter(RawQuery(query): RawQuery) -> String {
    query.unwrap_or_default()
}

async fn bad_request() -> StatusCode {
    StatusCode::BAD_REQUEST
}

async fn too_many() -> impl IntoResponse {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "errMsg": "too many requests" })),
    )
}

async fn unlimited_redirect() -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(LOCATION, "/unlimited-redirect")],
    )
}

async fn multi_value() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, "first=1"), (SET_COOKIE, "second=2")]),
        "ok",
    )
}

async fn slow() -> &'static str {
    tokio::time::sleep(SLOW_DELAY).await;
    "done"
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}
