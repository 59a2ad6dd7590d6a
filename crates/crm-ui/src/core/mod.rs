//! Core, DOM-free primitives shared by services and views.
pub mod auth;
pub mod board;
pub mod config;
pub mod store;
