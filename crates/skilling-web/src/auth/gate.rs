//! Admin policy gate.
//!
//! Runs before handlers on admin routes. One evaluation per request, no
//! retries. Every failure path denies: a check error or a panic inside the
//! check is logged and treated as "not an admin".

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use skilling_core::{AdminCheck, Principal};

use crate::app_state::AppState;
use crate::pages::account::sign_in_location;

/// Name under which admin routes are registered.
pub const ADMIN_POLICY: &str = "AdminPolicy";

/// Result of evaluating the admin requirement for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Succeeded,
    Failed,
}

impl GateOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            GateOutcome::Succeeded => "Succeeded",
            GateOutcome::Failed => "Failed",
        }
    }
}

#[derive(Clone)]
pub struct AdminGate {
    check: Arc<dyn AdminCheck>,
}

impl AdminGate {
    pub fn new(check: Arc<dyn AdminCheck>) -> Self {
        Self { check }
    }

    pub fn evaluate(&self, principal: &Principal) -> GateOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.check.is_admin(principal)));

        match result {
            Ok(Ok(true)) => {
                tracing::info!(policy = ADMIN_POLICY, mode = self.check.mode(), "admin authorization succeeded");
                GateOutcome::Succeeded
            }
            Ok(Ok(false)) => {
                tracing::warn!(policy = ADMIN_POLICY, mode = self.check.mode(), "admin authorization failed");
                GateOutcome::Failed
            }
            Ok(Err(e)) => {
                tracing::error!(
                    policy = ADMIN_POLICY,
                    code = e.client_code().as_str(),
                    error = %e,
                    "error during admin authorization check"
                );
                GateOutcome::Failed
            }
            Err(_) => {
                tracing::error!(policy = ADMIN_POLICY, "admin authorization check panicked");
                GateOutcome::Failed
            }
        }
    }
}

/// Middleware for routes tagged with `ADMIN_POLICY`.
pub async fn require_admin(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_default();

    match app.gate().evaluate(&principal) {
        GateOutcome::Succeeded => next.run(req).await,
        GateOutcome::Failed => deny(&app, &principal, &req),
    }
}

/// 403 for a known caller; otherwise a challenge suited to the auth mode.
fn deny(app: &AppState, principal: &Principal, req: &Request) -> Response {
    if principal.is_authenticated() {
        return (StatusCode::FORBIDDEN, "forbidden").into_response();
    }

    if app.automation_mode() {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            "unauthorized",
        )
            .into_response();
    }

    let return_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    (
        StatusCode::FOUND,
        [(header::LOCATION, sign_in_location(return_url))],
    )
        .into_response()
}
