//! HTTP route definitions.
//!
//! Every endpoint is served both at the root and under `/api`.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/health` | [`health::health`] |
//! | GET | `/sections` | [`sections::list`] |
//! | POST | `/sections` | [`sections::create`] |
//! | GET | `/sections/{id}` | [`sections::show`] |
//! | POST | `/sections/{id}/install` | [`installations::install`] |
//! | GET | `/sections/{id}/installed` | [`installations::installed`] |
//! | GET | `/installations` | [`installations::list`] |
//! | POST | `/seed` | [`seed::reseed`] |

pub mod health;
pub mod installations;
pub mod sections;
pub mod seed;

use axum::{
    Router,
    extract::rejection::QueryRejection,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Endpoints without state or layers applied.
fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/sections", get(sections::list).post(sections::create))
        .route("/sections/{id}", get(sections::show))
        .route("/sections/{id}/install", post(installations::install))
        .route("/sections/{id}/installed", get(installations::installed))
        .route("/installations", get(installations::list))
        .route("/seed", post(seed::reseed))
}

/// Build the complete application router.
///
/// Includes JSON 404/405 fallbacks, CORS, per-request tracing spans and
/// request ids. Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(endpoints())
        .nest("/api", endpoints())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors_layer())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_owned())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Turn a query-string rejection into a JSON 400.
pub(crate) fn bad_query(rejection: &QueryRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
