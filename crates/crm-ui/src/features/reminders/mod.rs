//! Reminder list and the dashboard widget.
//!
//! # Design
//! - The list always asks for `PENDING` reminders; the tab only adds a date window.
//! - Marking read refreshes the stats so the navbar badge follows.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
