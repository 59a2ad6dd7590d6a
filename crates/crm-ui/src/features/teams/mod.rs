//! Teams dashboard, member workloads and per-member task lists.

pub mod logic;
#[cfg(target_arch = "wasm32")]
pub mod view;
