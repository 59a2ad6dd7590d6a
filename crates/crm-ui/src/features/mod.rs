//! Feature slices: one folder per page.
//!
//! # Design
//! - `state`/`logic` modules stay DOM-free and are tested natively.
//! - `view` modules are wasm-only and talk to services through `ApiCtx`.

pub mod admin;
pub mod dashboard;
pub mod lead_detail;
pub mod leads;
pub mod new_lead;
pub mod notifications;
pub mod pipeline;
pub mod reminders;
pub mod tasks;
pub mod team_leads;
pub mod teams;
