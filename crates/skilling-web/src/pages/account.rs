//! Sign-in / sign-out redirects.
//!
//! The upstream front end owns the actual OIDC exchange; these routes only
//! point the browser at it (or answer 401 in automation mode, where there is
//! no browser flow).

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::app_state::AppState;

pub const SIGN_IN_PATH: &str = "/account/sign-in";

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    #[serde(rename = "returnUrl")]
    pub return_url: Option<String>,
}

pub async fn sign_in(State(app): State<AppState>, Query(q): Query<SignInQuery>) -> Response {
    if app.automation_mode() {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            "unauthorized",
        )
            .into_response();
    }

    let target = local_or_root(q.return_url.as_deref());
    let location = format!(
        "{}?post_login_redirect_uri={}",
        app.cfg().auth.login_path,
        urlencoding::encode(target)
    );
    found(location)
}

pub async fn sign_out(State(app): State<AppState>) -> Response {
    let location = format!(
        "{}?post_logout_redirect_uri={}",
        app.cfg().auth.logout_path,
        urlencoding::encode("/")
    );
    found(location)
}

/// Where the gate sends an anonymous browser.
pub fn sign_in_location(return_url: &str) -> String {
    format!(
        "{SIGN_IN_PATH}?returnUrl={}",
        urlencoding::encode(local_or_root(Some(return_url)))
    )
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Only same-site paths are accepted as redirect targets.
fn local_or_root(url: Option<&str>) -> &str {
    match url {
        Some(u) if u.starts_with('/') && !u.starts_with("//") && !u.starts_with("/\\") => u,
        _ => "/",
    }
}
