//! skilling web library entry.
//!
//! This crate wires configuration, request authentication, the admin policy
//! gate, and the page handlers into an axum app. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod ops;
pub mod pages;
pub mod router;
