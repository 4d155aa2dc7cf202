//! Admin determination strategies.
//!
//! Both strategies answer the same question for a request principal. Which one
//! runs is decided once at wiring time by `select_admin_check`.

use std::sync::Arc;

use crate::allowlist::{eq_ignore_case, AdminAllowList};
use crate::claims::identifying_name;
use crate::error::Result;
use crate::principal::{kinds, Principal};
use crate::settings::SettingsSource;

/// Client id whose tokens are admin in automation mode.
pub const AUTOMATION_ADMIN_CLIENT_ID: &str = "api://skilling-automation-admin";

/// Decides whether a principal is an administrator.
///
/// `Ok(false)` covers every "not an admin" outcome, including missing claims
/// and missing configuration. `Err` is reserved for faults (unreadable or
/// malformed configuration); callers must treat it as a deny.
pub trait AdminCheck: Send + Sync {
    fn is_admin(&self, principal: &Principal) -> Result<bool>;

    /// Short label for logs and the debug route.
    fn mode(&self) -> &'static str;
}

/// Matches the identifying claim against the configured allow-list.
pub struct AllowListAdminCheck {
    settings: Arc<dyn SettingsSource>,
    key: String,
}

impl AllowListAdminCheck {
    pub fn new(settings: Arc<dyn SettingsSource>, key: impl Into<String>) -> Self {
        Self {
            settings,
            key: key.into(),
        }
    }
}

impl AdminCheck for AllowListAdminCheck {
    fn is_admin(&self, principal: &Principal) -> Result<bool> {
        if !principal.is_authenticated() {
            return Ok(false);
        }

        let Some(name) = identifying_name(principal) else {
            tracing::warn!("identifying claim not found");
            return Ok(false);
        };

        // Read on every call so configuration changes apply without restart.
        let admins = AdminAllowList::load(self.settings.as_ref(), &self.key)?;
        let is_admin = admins.contains(name);

        tracing::info!(user = %name, is_admin, "admin check result");
        Ok(is_admin)
    }

    fn mode(&self) -> &'static str {
        "allowlist"
    }
}

/// Automation mode: the caller is a client application, identified by the
/// token audience rather than a user name.
#[derive(Debug, Default)]
pub struct AudienceAdminCheck;

impl AudienceAdminCheck {
    pub fn new() -> Self {
        Self
    }
}

impl AdminCheck for AudienceAdminCheck {
    fn is_admin(&self, principal: &Principal) -> Result<bool> {
        if !principal.is_authenticated() {
            return Ok(false);
        }

        let Some(aud) = principal.find_first(kinds::AUDIENCE).map(str::trim) else {
            tracing::warn!("audience claim not found");
            return Ok(false);
        };

        let bare = AUTOMATION_ADMIN_CLIENT_ID.trim_start_matches("api://");
        let is_admin =
            eq_ignore_case(aud, AUTOMATION_ADMIN_CLIENT_ID) || eq_ignore_case(aud, bare);

        tracing::info!(audience = %aud, is_admin, "admin check result");
        Ok(is_admin)
    }

    fn mode(&self) -> &'static str {
        "audience"
    }
}

/// Pick the determination strategy for this process.
pub fn select_admin_check(
    automation_mode: bool,
    settings: Arc<dyn SettingsSource>,
    key: &str,
) -> Arc<dyn AdminCheck> {
    if automation_mode {
        Arc::new(AudienceAdminCheck::new())
    } else {
        Arc::new(AllowListAdminCheck::new(settings, key))
    }
}
