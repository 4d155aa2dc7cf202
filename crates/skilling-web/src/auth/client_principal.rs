//! Upstream identity header decoding.
//!
//! Credential validation happens in front of the app (App Service
//! authentication). It forwards the validated principal as base64 JSON:
//! `{"auth_typ": "aad", "claims": [{"typ": "...", "val": "..."}]}`.

use axum::http::{HeaderMap, HeaderName};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use skilling_core::error::{Result, SkillingError};
use skilling_core::principal::kinds;
use skilling_core::{Claim, Principal};

/// Upper bound on the encoded header we are willing to decode.
const MAX_HEADER_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
struct ClientPrincipal {
    auth_typ: String,
    #[serde(default)]
    claims: Vec<ClientClaim>,
}

#[derive(Debug, Deserialize)]
struct ClientClaim {
    typ: String,
    val: String,
}

/// Decode one header value into an authenticated principal.
pub fn decode(raw: &str) -> Result<Principal> {
    if raw.len() > MAX_HEADER_BYTES {
        return Err(SkillingError::BadRequest("client principal too large".into()));
    }
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|e| SkillingError::BadRequest(format!("client principal not base64: {e}")))?;
    let cp: ClientPrincipal = serde_json::from_slice(&bytes)
        .map_err(|e| SkillingError::BadRequest(format!("client principal not json: {e}")))?;

    if cp.auth_typ.trim().is_empty() {
        return Err(SkillingError::BadRequest("client principal missing auth_typ".into()));
    }

    let claims = cp
        .claims
        .into_iter()
        .map(|c| Claim::new(normalize_kind(&c.typ), c.val))
        .collect();
    Ok(Principal::authenticated(cp.auth_typ, claims))
}

/// Principal for a request. Missing or unreadable headers yield an anonymous
/// principal; the gate then challenges instead of failing the request.
pub fn from_headers(headers: &HeaderMap, header: &HeaderName) -> Principal {
    let Some(value) = headers.get(header) else {
        return Principal::anonymous();
    };
    let decoded = value
        .to_str()
        .map_err(|e| SkillingError::BadRequest(format!("client principal not ascii: {e}")))
        .and_then(decode);

    match decoded {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, header = %header, "ignoring unreadable client principal");
            Principal::anonymous()
        }
    }
}

/// Map the long WS-Federation claim URIs onto the short OIDC kinds.
fn normalize_kind(typ: &str) -> &str {
    match typ {
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress" => kinds::EMAIL,
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name" => kinds::NAME,
        other => other,
    }
}

/// Encode `principal` the way the upstream front end does. Used by tests and
/// local tooling to fabricate requests.
pub fn encode(principal: &Principal) -> String {
    let claims: Vec<serde_json::Value> = principal
        .claims()
        .iter()
        .map(|c| serde_json::json!({ "typ": c.kind, "val": c.value }))
        .collect();
    let body = serde_json::json!({
        "auth_typ": principal.auth_type().unwrap_or("aad"),
        "claims": claims,
    });
    STANDARD.encode(body.to_string())
}
