//! Common test utilities for integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` against an
//! in-memory gadget store, so no database is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use domain::models::gadget::{Gadget, GadgetChanges, GadgetStatus};
use domain::services::{GadgetStore, InMemoryGadgetStore, StoreError};
use gadgets_api::{
    app::create_app,
    config::{
        Config, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig, StoreBackend,
        StoreConfig,
    },
};

/// Test configuration using the in-memory backend.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        store: StoreConfig {
            backend: StoreBackend::Memory,
        },
    }
}

/// Build the application around the given store.
pub fn create_test_app(store: Arc<dyn GadgetStore>) -> Router {
    create_app(test_config(), store, None)
}

/// Build the application around a fresh, empty in-memory store.
///
/// The store is returned too so tests can inspect what was persisted.
pub fn create_memory_app() -> (Router, Arc<InMemoryGadgetStore>) {
    let store = Arc::new(InMemoryGadgetStore::new());
    (create_test_app(store.clone()), store)
}

/// Store wrapper that counts every call reaching the inner store.
pub struct CountingStore {
    inner: InMemoryGadgetStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: InMemoryGadgetStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GadgetStore for CountingStore {
    async fn create(&self, name: &str) -> Result<Gadget, StoreError> {
        self.hit();
        self.inner.create(name).await
    }

    async fn find_many(&self, status: Option<GadgetStatus>) -> Result<Vec<Gadget>, StoreError> {
        self.hit();
        self.inner.find_many(status).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gadget>, StoreError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, changes: GadgetChanges) -> Result<Gadget, StoreError> {
        self.hit();
        self.inner.update(id, changes).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.hit();
        self.inner.ping().await
    }
}

/// Create a gadget with a given name and status for seeding a store.
pub fn seeded_gadget(name: &str, status: GadgetStatus) -> Gadget {
    let mut gadget = Gadget::new(name);
    gadget.status = status;
    match status {
        GadgetStatus::Decommissioned => gadget.decommissioned_at = Some(chrono::Utc::now()),
        GadgetStatus::Destroyed => gadget.destroyed_at = Some(chrono::Utc::now()),
        _ => {}
    }
    gadget
}

/// Parse response body as JSON.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse response body as JSON")
}

/// Read response body as text.
pub async fn response_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(body.to_vec()).expect("Response body is not UTF-8")
}

/// Build a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).expect("valid JSON")))
        .expect("Failed to build request")
}

/// Build a request without a body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    empty_request(Method::GET, uri)
}
