#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use skilling_core::admin::AUTOMATION_ADMIN_CLIENT_ID;
use skilling_core::error::{Result, SkillingError};
use skilling_core::principal::kinds;
use skilling_core::{AdminCheck, Claim, Principal};
use skilling_web::app_state::AppState;
use skilling_web::auth::{client_principal, AdminGate, GateOutcome};
use skilling_web::config::{self, SettingsStore};
use skilling_web::router::build_router;

const PRODUCTION: &str = r#"
version: 1
settings:
  AdminUserPrincipalNames: ["ADMIN@EXAMPLE.COM"]
"#;

const AUTOMATION: &str = r#"
version: 1
auth:
  automation_mode: true
"#;

fn app_with(yaml: &str) -> (Router, Arc<SettingsStore>) {
    let cfg = config::load_from_str(yaml).unwrap();
    let settings = Arc::new(SettingsStore::from_pairs(
        config::settings_pairs(&cfg, Vec::new()).unwrap(),
    ));
    let state = AppState::new(cfg, Arc::clone(&settings)).unwrap();
    (build_router(state), settings)
}

fn user(claims: &[(&str, &str)]) -> Principal {
    Principal::authenticated(
        "aad",
        claims.iter().map(|(k, v)| Claim::new(*k, *v)).collect(),
    )
}

async fn get(app: &Router, uri: &str, principal: Option<&Principal>) -> axum::response::Response {
    let mut req = Request::builder().uri(uri);
    if let Some(p) = principal {
        req = req.header("x-ms-client-principal", client_principal::encode(p));
    }
    app.clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn admin_reaches_protected_page() {
    let (app, _) = app_with(PRODUCTION);
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);
    let resp = get(&app, "/manage-graph", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn email_fallback_reaches_protected_page() {
    let (app, settings) = app_with("version: 1\n");
    settings.set("AdminUserPrincipalNames", "test@example.com");
    let p = user(&[(kinds::EMAIL, "test@example.com")]);
    let resp = get(&app, "/manage-graph", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_admin_gets_forbidden() {
    let (app, _) = app_with(PRODUCTION);
    let p = user(&[(kinds::PREFERRED_USERNAME, "someone@example.com")]);
    let resp = get(&app, "/manage-graph", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_browser_is_sent_to_sign_in() {
    let (app, _) = app_with(PRODUCTION);
    let resp = get(&app, "/manage-graph?tab=nodes", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(location, "/account/sign-in?returnUrl=%2Fmanage-graph%3Ftab%3Dnodes");
}

#[tokio::test]
async fn no_configuration_denies_everyone() {
    let (app, _) = app_with("version: 1\n");
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);
    let resp = get(&app, "/manage-graph", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn settings_changes_apply_to_next_request() {
    let (app, settings) = app_with(PRODUCTION);
    let p = user(&[(kinds::PREFERRED_USERNAME, "new@example.com")]);
    assert_eq!(get(&app, "/manage-graph", Some(&p)).await.status(), StatusCode::FORBIDDEN);

    settings.set("AdminUserPrincipalNames:1", "new@example.com");
    assert_eq!(get(&app, "/manage-graph", Some(&p)).await.status(), StatusCode::OK);

    settings.reload(Vec::new());
    assert_eq!(get(&app, "/manage-graph", Some(&p)).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn oversized_allow_list_fails_closed() {
    let (app, settings) = app_with("version: 1\n");
    let raw = (0..2000)
        .map(|i| format!("user{i}@example.com"))
        .collect::<Vec<_>>()
        .join(",");
    settings.set("AdminUserPrincipalNames", raw);

    let p = user(&[(kinds::PREFERRED_USERNAME, "user1@example.com")]);
    let resp = get(&app, "/manage-graph", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_identity_header_is_challenged() {
    let (app, _) = app_with(PRODUCTION);
    let req = Request::builder()
        .uri("/manage-graph")
        .header("x-ms-client-principal", "!!!")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn automation_mode_admits_admin_client() {
    let (app, _) = app_with(AUTOMATION);
    let p = user(&[(kinds::AUDIENCE, AUTOMATION_ADMIN_CLIENT_ID)]);
    assert_eq!(get(&app, "/manage-graph", Some(&p)).await.status(), StatusCode::OK);

    let p = user(&[(kinds::AUDIENCE, "api://other")]);
    assert_eq!(get(&app, "/manage-graph", Some(&p)).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn automation_mode_challenges_with_401() {
    let (app, _) = app_with(AUTOMATION);
    let resp = get(&app, "/manage-graph", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let resp = get(&app, "/account/sign-in", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_do_not_need_admin() {
    let (app, _) = app_with(PRODUCTION);
    assert_eq!(get(&app, "/", None).await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/healthz", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_in_redirects_to_login_with_local_return_url() {
    let (app, _) = app_with(PRODUCTION);
    let resp = get(&app, "/account/sign-in?returnUrl=/manage-graph", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/.auth/login/aad?post_login_redirect_uri=%2Fmanage-graph"
    );

    let resp = get(&app, "/account/sign-in?returnUrl=https://evil.example", None).await;
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/.auth/login/aad?post_login_redirect_uri=%2F"
    );
}

#[tokio::test]
async fn sign_out_redirects_to_logout() {
    let (app, _) = app_with(PRODUCTION);
    let resp = get(&app, "/account/sign-out", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/.auth/logout?post_logout_redirect_uri=%2F"
    );
}

#[tokio::test]
async fn debug_reports_decision() {
    let (app, _) = app_with(PRODUCTION);
    let p = user(&[
        (kinds::PREFERRED_USERNAME, "admin@example.com"),
        (kinds::NAME, "Admin"),
    ]);
    let body = json_body(get(&app, "/debug", Some(&p)).await).await;
    assert_eq!(body["is_authenticated"], true);
    assert_eq!(body["identifying_name"], "admin@example.com");
    assert_eq!(body["user_name"], "Admin");
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["admin_policy_result"], "Succeeded");
    assert_eq!(body["admin_mode"], "allowlist");

    let body = json_body(get(&app, "/debug", None).await).await;
    assert_eq!(body["is_authenticated"], false);
    assert_eq!(body["is_admin"], false);
    assert_eq!(body["admin_policy_result"], "Unknown");
}

struct FaultyCheck;

impl AdminCheck for FaultyCheck {
    fn is_admin(&self, _principal: &Principal) -> Result<bool> {
        Err(SkillingError::Internal("boom".into()))
    }
    fn mode(&self) -> &'static str {
        "faulty"
    }
}

struct PanickingCheck;

impl AdminCheck for PanickingCheck {
    fn is_admin(&self, _principal: &Principal) -> Result<bool> {
        panic!("check exploded");
    }
    fn mode(&self) -> &'static str {
        "panicking"
    }
}

#[test]
fn gate_fails_closed_on_error() {
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);
    assert_eq!(AdminGate::new(Arc::new(FaultyCheck)).evaluate(&p), GateOutcome::Failed);
}

#[test]
fn gate_fails_closed_on_panic() {
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);
    assert_eq!(AdminGate::new(Arc::new(PanickingCheck)).evaluate(&p), GateOutcome::Failed);
}

struct CountingCheck {
    calls: Arc<AtomicUsize>,
}

impl AdminCheck for CountingCheck {
    fn is_admin(&self, _principal: &Principal) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
    fn mode(&self) -> &'static str {
        "counting"
    }
}

fn app_with_check(check: Arc<dyn AdminCheck>) -> Router {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let state = AppState::with_admin_check(cfg, Arc::new(SettingsStore::new()), check).unwrap();
    build_router(state)
}

#[tokio::test]
async fn debug_evaluates_the_check_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with_check(Arc::new(CountingCheck { calls: Arc::clone(&calls) }));
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);

    let body = json_body(get(&app, "/debug", Some(&p)).await).await;
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["admin_policy_result"], "Succeeded");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn debug_survives_panicking_check() {
    let app = app_with_check(Arc::new(PanickingCheck));
    let p = user(&[(kinds::PREFERRED_USERNAME, "admin@example.com")]);

    let resp = get(&app, "/debug", Some(&p)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["is_admin"], false);
    assert_eq!(body["admin_policy_result"], "Failed");
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn index_logs_access() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (app, _) = app_with(PRODUCTION);
    let p = user(&[(kinds::NAME, "Ann")]);
    assert_eq!(get(&app, "/", Some(&p)).await.status(), StatusCode::OK);

    let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(out.contains("home page accessed"), "{out}");
}
