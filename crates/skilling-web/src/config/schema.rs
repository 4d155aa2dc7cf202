use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::Deserialize;
use skilling_core::allowlist::ADMIN_KEY;
use skilling_core::error::{Result, SkillingError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub auth: AuthSection,

    /// Free-form settings read at decision time (admin allow-list lives here).
    #[serde(default)]
    pub settings: serde_yaml::Value,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SkillingError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if !matches!(
            self.settings,
            serde_yaml::Value::Null | serde_yaml::Value::Mapping(_)
        ) {
            return Err(SkillingError::Config("settings must be a mapping".into()));
        }

        self.server.validate()?;
        self.auth.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SkillingError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// UI-testing deployment: callers are client apps identified by token audience,
    /// and unauthenticated requests get 401 instead of a sign-in redirect.
    #[serde(default)]
    pub automation_mode: bool,

    /// Header carrying the upstream-validated principal.
    #[serde(default = "default_principal_header")]
    pub principal_header: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// Settings key holding the admin allow-list.
    #[serde(default = "default_admin_key")]
    pub admin_key: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            automation_mode: false,
            principal_header: default_principal_header(),
            login_path: default_login_path(),
            logout_path: default_logout_path(),
            admin_key: default_admin_key(),
        }
    }
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        self.principal_header_name()?;
        for (name, path) in [
            ("auth.login_path", &self.login_path),
            ("auth.logout_path", &self.logout_path),
        ] {
            if !path.starts_with('/') {
                return Err(SkillingError::Config(format!("{name} must start with '/'")));
            }
        }
        if self.admin_key.trim().is_empty() {
            return Err(SkillingError::Config("auth.admin_key must not be empty".into()));
        }
        Ok(())
    }

    pub fn principal_header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.principal_header.as_bytes()).map_err(|e| {
            SkillingError::Config(format!("auth.principal_header is not a header name: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_principal_header() -> String {
    "x-ms-client-principal".into()
}
fn default_login_path() -> String {
    "/.auth/login/aad".into()
}
fn default_logout_path() -> String {
    "/.auth/logout".into()
}
fn default_admin_key() -> String {
    ADMIN_KEY.into()
}
