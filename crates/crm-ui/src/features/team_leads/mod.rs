//! Team lead table with filters, bulk assignment and CSV export.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
