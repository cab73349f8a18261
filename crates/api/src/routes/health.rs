//! Liveness and readiness check.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Query parameters for the health check.
#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    /// Also check storage connectivity (`1` or `true`).
    pub db: Option<String>,
}

impl HealthQuery {
    fn check_db(&self) -> bool {
        matches!(self.db.as_deref().map(str::trim), Some("1" | "true"))
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

const RUNNING: &str = "Section Factory API is running";

/// `GET /health[?db=1]`
///
/// Always reports the process as up (`status: "ok"`), even when the
/// storage ping fails. With `db=1` the backend is pinged as well and a
/// failure turns the response into a 500 carrying `database: "error"`.
pub async fn health(
    State(state): State<AppState>,
    query: Result<Query<HealthQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();

    if !query.check_db() {
        return Json(HealthBody {
            status: "ok",
            message: RUNNING,
            database: None,
            error: None,
        })
        .into_response();
    }

    match state.store().ping().await {
        Ok(()) => Json(HealthBody {
            status: "ok",
            message: RUNNING,
            database: Some("connected"),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthBody {
                    status: "ok",
                    message: RUNNING,
                    database: Some("error"),
                    error: Some("Database connection failed"),
                }),
            )
                .into_response()
        }
    }
}
