//! Integration tests for Section Factory.
//!
//! The tests drive the real application router in-process with
//! `tower::ServiceExt::oneshot`, backed by a [`MemoryStore`], so no database
//! or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p section-factory-integration-tests
//! ```

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use section_factory_api::db::{MemoryStore, SectionStore};
use section_factory_api::seed::bundled_catalog;
use section_factory_api::state::AppState;
use section_factory_core::{NewSection, SectionDraft, SectionFilter, SectionId};

/// An application router together with the store behind it.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    /// An app over an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = section_factory_api::app(AppState::new(store.clone()));
        Self { store, router }
    }

    /// An app over the bundled six-section catalog.
    pub async fn seeded() -> Self {
        Self::with_sections(bundled_catalog().expect("bundled catalog parses")).await
    }

    /// An app over the given sections, stored in order.
    pub async fn with_sections(sections: Vec<NewSection>) -> Self {
        let app = Self::empty();
        app.store
            .reseed(sections)
            .await
            .expect("memory reseed cannot fail");
        app
    }

    /// Send a request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET` a path and decode the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        let response = self.send(request).await;
        (response.status(), json_body(response).await)
    }

    /// `POST` a JSON body and decode the JSON response.
    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        let response = self.send(request).await;
        (response.status(), json_body(response).await)
    }

    /// Id of the section with the given name.
    pub async fn section_id(&self, name: &str) -> SectionId {
        self.store
            .list_sections(&SectionFilter::default())
            .await
            .expect("memory list cannot fail")
            .into_iter()
            .find(|s| s.name == name)
            .map(|s| s.id)
            .unwrap_or_else(|| panic!("no section named {name}"))
    }

    /// Current download count of a section.
    pub async fn downloads(&self, id: SectionId) -> u32 {
        self.store
            .get_section(id)
            .await
            .expect("memory get cannot fail")
            .expect("section exists")
            .downloads
    }
}

/// Read a response body as JSON.
pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

/// Names of the sections in a JSON array response, in order.
#[must_use]
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|s| s["name"].as_str().expect("name is a string").to_owned())
        .collect()
}

/// A valid section for tests.
#[must_use]
pub fn section(name: &str, category: &str, price: &str, is_free: bool) -> NewSection {
    SectionDraft {
        name: Some(name.to_owned()),
        description: Some(format!("{name} for storefronts")),
        category: Some(category.to_owned()),
        price: Some(Decimal::from_str(price).expect("decimal literal")),
        is_free: Some(is_free),
        preview_image: Some("/previews/test.png".to_owned()),
        liquid_code: Some("<div class=\"test\"></div>".to_owned()),
        ..SectionDraft::default()
    }
    .validate()
    .expect("test section is valid")
}
