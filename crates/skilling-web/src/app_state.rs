//! Shared application state for the skilling web app.
//!
//! The admin strategy is chosen here, once, from `auth.automation_mode`;
//! handlers and the gate only see `dyn AdminCheck`.

use std::sync::Arc;

use axum::http::HeaderName;

use skilling_core::error::Result;
use skilling_core::{select_admin_check, AdminCheck, SettingsSource};

use crate::auth::AdminGate;
use crate::config::{AppConfig, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    principal_header: HeaderName,
    settings: Arc<SettingsStore>,
    admin_check: Arc<dyn AdminCheck>,
    gate: AdminGate,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: AppConfig, settings: Arc<SettingsStore>) -> Result<Self> {
        let source: Arc<dyn SettingsSource> = settings.clone();
        let admin_check = select_admin_check(cfg.auth.automation_mode, source, &cfg.auth.admin_key);
        Self::with_admin_check(cfg, settings, admin_check)
    }

    /// Build with an explicit determination strategy instead of the one
    /// `auth.automation_mode` selects.
    pub fn with_admin_check(
        cfg: AppConfig,
        settings: Arc<SettingsStore>,
        admin_check: Arc<dyn AdminCheck>,
    ) -> Result<Self> {
        let principal_header = cfg.auth.principal_header_name()?;
        let gate = AdminGate::new(Arc::clone(&admin_check));

        tracing::info!(
            mode = admin_check.mode(),
            admin_key = %cfg.auth.admin_key,
            "admin determination wired"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                principal_header,
                settings,
                admin_check,
                gate,
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.inner.settings)
    }

    pub fn principal_header(&self) -> &HeaderName {
        &self.inner.principal_header
    }

    pub fn automation_mode(&self) -> bool {
        self.inner.cfg.auth.automation_mode
    }

    pub fn admin_check(&self) -> Arc<dyn AdminCheck> {
        Arc::clone(&self.inner.admin_check)
    }

    pub fn gate(&self) -> &AdminGate {
        &self.inner.gate
    }
}
