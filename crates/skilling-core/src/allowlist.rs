//! Admin allow-list loading and matching.
//!
//! The list is accepted in two shapes so the caller does not need to know
//! which one a deployment used:
//! - indexed entries (`AdminUserPrincipalNames:0`, `:1`, ...) from a settings file
//! - one comma-separated string from an environment variable or pipeline secret
//!
//! The indexed form wins when it yields at least one non-empty entry.

use crate::error::{Result, SkillingError};
use crate::settings::SettingsSource;

/// Default settings key holding the admin identifiers.
pub const ADMIN_KEY: &str = "AdminUserPrincipalNames";

/// Upper bound on entries; the list is re-read on every check.
pub const MAX_ADMIN_ENTRIES: usize = 1024;

/// Identifiers treated as administrators. Entries are trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    entries: Vec<String>,
}

impl AdminAllowList {
    /// Load from `source` at `key`. A missing key yields an empty list.
    pub fn load(source: &dyn SettingsSource, key: &str) -> Result<Self> {
        let listed = Self::from_entries(source.list(key)?);
        let list = if !listed.is_empty() {
            listed
        } else {
            match source.value(key)? {
                Some(raw) => Self::from_delimited(&raw),
                None => Self::default(),
            }
        };

        if list.len() > MAX_ADMIN_ENTRIES {
            return Err(SkillingError::Config(format!(
                "{key} has {} entries (max {MAX_ADMIN_ENTRIES})",
                list.len()
            )));
        }
        Ok(list)
    }

    /// Parse a comma-separated string.
    pub fn from_delimited(raw: &str) -> Self {
        Self::from_entries(raw.split(','))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| eq_ignore_case(e, name))
    }
}

/// Ordinal case-insensitive equality: per-character simple upper-casing, no
/// locale rules. Characters whose upper-case form is not a single character
/// compare exactly, so compatibility look-alikes (KELVIN SIGN vs `K`) differ.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().map(simple_upper).eq(b.chars().map(simple_upper))
}

fn simple_upper(c: char) -> char {
    let mut up = c.to_uppercase();
    match (up.next(), up.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
