//! Task list feature.
//!
//! # Design
//! - Filtering is client-side over the list the server returned.
//! - The clock is passed in so the date buckets are testable.

pub mod logic;
#[cfg(target_arch = "wasm32")]
pub mod view;
