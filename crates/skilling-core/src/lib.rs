//! skilling core: the admin authorization decision, independent of HTTP.
//!
//! This crate defines the principal model, the allow-list parser, the admin
//! determination strategies, and the shared error surface. It carries no
//! transport or runtime dependencies so the web crate and tests can reuse it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `SkillingError`/`Result` so a bad setting
//! turns into a deny at the gate instead of a crashed request.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod admin;
pub mod allowlist;
pub mod claims;
pub mod error;
pub mod principal;
pub mod settings;

pub use admin::{select_admin_check, AdminCheck};
pub use error::{Result, SkillingError};
pub use principal::{Claim, Principal};
pub use settings::SettingsSource;
