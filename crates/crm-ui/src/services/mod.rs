//! HTTP plumbing and one thin service per REST resource.
//!
//! # Design
//! - `api` owns the interceptor chain (loader, bearer token, refresh-and-retry).
//! - Resource services map each call to exactly one request and never cache.
//! - Transports are swappable: `gloo-net` in the browser, `reqwest` natively.

pub mod admin;
pub mod api;
pub mod auth;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod error;
pub mod http;
pub mod leads;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod notifications;
pub mod pipeline;
pub mod reminders;
pub mod reports;
pub mod tasks;
pub mod teams;

#[cfg(test)]
pub(crate) mod testing;
