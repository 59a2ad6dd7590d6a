//! Lead detail page: stage, assignment, financials, documents, notes and tasks.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
