pub(crate) mod auth;
pub(crate) mod kanban;
pub(crate) mod loader;
pub(crate) mod shell;
pub(crate) mod toast;
