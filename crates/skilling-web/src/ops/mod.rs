//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness (outside authentication)

use axum::{http::StatusCode, response::IntoResponse};

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
