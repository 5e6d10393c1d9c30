use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::LOCATION;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;

use crate::clicks::ClickContext;
use crate::clicks::ClickEvent;
use crate::create_router;
use crate::links::Link;
use crate::links::validate_new_link;
use crate::storage;
use crate::storage::Memory;
use crate::storage::Storage;

/// Error response
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub error: String,
    pub description: Option<String>,
}

/// Storage that can be told to fail, backed by memory
#[derive(Clone, Debug, Default)]
pub struct FailingStorage {
    inner: Memory,
    fail_lookups: bool,
    fail_clicks: bool,
    click_attempts: Arc<AtomicUsize>,
}

impl FailingStorage {
    /// Every link lookup fails
    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    /// Every click insert fails
    pub fn failing_clicks() -> Self {
        Self {
            fail_clicks: true,
            ..Self::default()
        }
    }

    /// The memory storage behind it
    pub fn inner(&self) -> &Memory {
        &self.inner
    }

    /// Number of times a click was attempted, failed or not
    pub fn click_attempts(&self) -> usize {
        self.click_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn find_single_link_by_short_code(
        &self,
        short_code: &str,
    ) -> storage::Result<Option<Link>> {
        if self.fail_lookups {
            return Err(storage::Error::Connection(
                "connection refused by 10.0.0.12:5432".to_string(),
            ));
        }

        self.inner.find_single_link_by_short_code(short_code).await
    }

    async fn save_click(
        &self,
        link: &Link,
        context: &ClickContext,
    ) -> storage::Result<ClickEvent> {
        self.click_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_clicks {
            return Err(storage::Error::Connection("pool timed out".to_string()));
        }

        self.inner.save_click(link, context).await
    }

    async fn count_clicks_by_link(&self, link: &Link) -> storage::Result<i64> {
        self.inner.count_clicks_by_link(link).await
    }
}

/// Seed a validated link
pub async fn create_link(storage: &Memory, short_code: &str, url: &str) -> Link {
    let url = validate_new_link(short_code, url).unwrap();

    create_link_unchecked(storage, short_code, &url).await
}

/// Seed a link, skipping validation
///
/// Mimics links that were stored before validation was in place
pub async fn create_link_unchecked(storage: &Memory, short_code: &str, url: &str) -> Link {
    storage.create_link(short_code, url).await.unwrap()
}

/// Setup the Lynkscope app with memory storage
pub fn setup_test_app() -> (Router, Memory) {
    let storage = Memory::new();

    (create_router(storage.clone()), storage)
}

/// Setup the Lynkscope app with the given storage
pub fn setup_test_app_with_storage<S: Storage>(storage: S) -> Router {
    create_router(storage)
}

async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.call(request).await.unwrap();

    let status_code = response.status();
    let headers = response.headers().clone();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, headers, body)
}

pub async fn root(app: &mut Router, path: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/{path}"))
        .body(Body::empty())
        .unwrap();

    let (status_code, headers, body) = send(app, request).await;

    let location = headers.get(LOCATION);
    let location = location.map(|header| header.to_str().unwrap().to_string());

    let body = String::from_utf8_lossy(&body[..]).to_string();

    (status_code, location, body)
}

pub async fn resolve_with_request_details(
    app: &mut Router,
    short_code: &str,
    headers: &[(&str, &str)],
    client_address: Option<SocketAddr>,
) -> (StatusCode, Option<String>, Option<String>) {
    let mut payload = Map::new();
    payload.insert(
        "shortCode".to_string(),
        Value::String(short_code.to_string()),
    );

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/links/resolve")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());

    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let mut request = builder
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    if let Some(client_address) = client_address {
        request.extensions_mut().insert(ConnectInfo(client_address));
    }

    let (status_code, _, body) = send(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_url(&body))
        } else {
            None
        },
        if status_code == StatusCode::OK {
            None
        } else {
            Some(get_error_message(&body))
        },
    )
}

pub async fn resolve(
    app: &mut Router,
    short_code: &str,
) -> (StatusCode, Option<String>, Option<String>) {
    resolve_with_request_details(app, short_code, &[], None).await
}

pub async fn resolve_with_raw_body(
    app: &mut Router,
    body: &'static str,
    include_content_type: bool,
) -> (StatusCode, Option<Error>) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/links/resolve");

    if include_content_type {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = builder.body(Body::from(body.as_bytes())).unwrap();

    let (status_code, _, body) = send(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            None
        } else {
            Some(get_error(&body))
        },
    )
}

pub async fn clicks(app: &mut Router, short_code: &str) -> (StatusCode, Option<i64>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/links/{short_code}/clicks"))
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = send(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_clicks(&body))
        } else {
            None
        },
    )
}

pub async fn preflight(app: &mut Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header("origin", "https://somewhere.example.net")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,authorization")
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

pub async fn resolve_cross_origin(app: &mut Router, short_code: &str) -> (StatusCode, HeaderMap) {
    let mut payload = Map::new();
    payload.insert(
        "shortCode".to_string(),
        Value::String(short_code.to_string()),
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/links/resolve")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header("origin", "https://somewhere.example.net")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let (status_code, headers, _) = send(app, request).await;

    (status_code, headers)
}

fn get_url(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["url"]
        .as_str()
        .map(ToString::to_string)
        .unwrap()
}

fn get_clicks(body: &Bytes) -> i64 {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["clicks"]
        .as_i64()
        .unwrap()
}

fn value_to_error(error: &Map<String, Value>) -> Error {
    Error {
        error: error["error"].as_str().map(ToString::to_string).unwrap(),
        description: error
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn get_error(body: &Bytes) -> Error {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_error)
        .unwrap()
}

fn get_error_message(body: &Bytes) -> String {
    get_error(body).error
}
