//! Tech pipeline kanban feature.
//!
//! # Design
//! - Same optimistic flow as the lead board, with a `PATCH` instead of a transition.
//! - Success is announced with a toast; failure reverts and toasts.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
