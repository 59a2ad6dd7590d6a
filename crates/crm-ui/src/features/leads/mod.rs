//! Lead kanban feature.
//!
//! # Design
//! - The board lives in the shared store so late responses settle against current state.
//! - Drag and drop is optimistic: move locally, persist, revert on failure.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
