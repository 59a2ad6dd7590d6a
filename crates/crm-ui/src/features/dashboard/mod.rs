//! Landing page: headline figures, the reminder widget and shortcuts.

pub mod logic;
#[cfg(target_arch = "wasm32")]
pub mod view;
