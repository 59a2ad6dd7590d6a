//! User administration page.
//!
//! # Design
//! - Thresholds are parsed client-side only to reject non-numbers; the server owns validation.
//! - Every save re-fetches the user list.

pub mod logic;
#[cfg(target_arch = "wasm32")]
pub mod view;
