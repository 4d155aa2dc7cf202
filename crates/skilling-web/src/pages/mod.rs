//! Page handlers.
//!
//! Rendering is deliberately plain: the interesting part of each page is who
//! may see it, not what it looks like.

pub mod account;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use skilling_core::claims::identifying_name;

use crate::app_state::AppState;
use crate::auth::{CurrentPrincipal, GateOutcome, ADMIN_POLICY};

pub async fn index(CurrentPrincipal(p): CurrentPrincipal) -> impl IntoResponse {
    tracing::info!(user = ?p.name(), "home page accessed");
    match p.name() {
        Some(name) if p.is_authenticated() => format!("skilling\nsigned in as {name}\n"),
        _ if p.is_authenticated() => "skilling\nsigned in\n".to_string(),
        _ => format!("skilling\nnot signed in ({})\n", account::SIGN_IN_PATH),
    }
}

/// Admin-only page; reachable only through `gate::require_admin`.
pub async fn manage_graph(CurrentPrincipal(p): CurrentPrincipal) -> impl IntoResponse {
    tracing::info!(user = ?p.name(), "manage graph page accessed");
    "manage graph\n"
}

/// Claims and admin decisions for the caller, for troubleshooting sign-in.
pub async fn debug(
    State(app): State<AppState>,
    CurrentPrincipal(p): CurrentPrincipal,
) -> impl IntoResponse {
    let claims: Vec<_> = p
        .claims()
        .iter()
        .map(|c| json!({ "type": c.kind, "value": c.value }))
        .collect();

    // Evaluated once, through the gate.
    let outcome = p.is_authenticated().then(|| app.gate().evaluate(&p));
    let is_admin = outcome == Some(GateOutcome::Succeeded);
    let policy_result = outcome.map_or("Unknown", GateOutcome::as_str);

    Json(json!({
        "is_authenticated": p.is_authenticated(),
        "authentication_type": p.auth_type(),
        "user_name": p.name(),
        "identifying_name": identifying_name(&p),
        "claims": claims,
        "admin_mode": app.admin_check().mode(),
        "is_admin": is_admin,
        "admin_policy": ADMIN_POLICY,
        "admin_policy_result": policy_result,
    }))
}
