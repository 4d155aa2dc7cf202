//! Request authentication and the admin policy gate.
//!
//! `authenticate` runs on every page route and stores the request `Principal`
//! in the request extensions; `gate::require_admin` and the `CurrentPrincipal`
//! extractor read it from there.

pub mod client_principal;
pub mod gate;

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use skilling_core::Principal;

use crate::app_state::AppState;

pub use gate::{AdminGate, GateOutcome, ADMIN_POLICY};

pub async fn authenticate(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let principal = client_principal::from_headers(req.headers(), app.principal_header());
    req.extensions_mut().insert(principal);
    next.run(req).await
}

/// Principal of the current request (anonymous when none was attached).
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<Principal>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
