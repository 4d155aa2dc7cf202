//! Top-level facade crate for skilling.
//!
//! Re-exports the authorization core and the web library so users can depend on a single crate.

pub mod core {
    pub use skilling_core::*;
}

pub mod web {
    pub use skilling_web::*;
}
