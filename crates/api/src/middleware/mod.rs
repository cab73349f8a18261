//! HTTP middleware.

pub mod request_id;

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// CORS policy for the browsing UI: any origin, read and install calls only.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([REQUEST_ID_HEADER.clone()])
}
