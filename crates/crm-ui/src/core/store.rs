//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Use small, focused slices so reducers stay predictable.
//! - Reducers are plain functions over a slice so they test without a DOM.

use crate::core::auth::Session;
use crate::features::leads::state::LeadBoardState;
use crate::features::pipeline::state::PipelineBoardState;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Milliseconds a toast stays on screen before auto-dismissal.
pub const TOAST_TIMEOUT_MS: u32 = 5_000;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Current session, mirrored from session storage.
    pub auth: AuthSlice,
    /// Unread counters published by the notification and reminder services.
    pub unread: UnreadSlice,
    /// In-flight request counter driving the global loader.
    pub loader: LoaderSlice,
    /// Visible toasts.
    pub toasts: ToastSlice,
    /// Lead kanban board.
    pub leads: LeadBoardState,
    /// Tech pipeline kanban board.
    pub pipeline: PipelineBoardState,
}

/// Shared authentication state for the UI.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AuthSlice {
    /// Active session, if signed in.
    pub session: Option<Session>,
}

impl AuthSlice {
    /// Whether a usable session exists.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::has_token)
    }
}

/// Unread counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UnreadSlice {
    /// Unread notifications.
    pub notifications: u32,
    /// Unread reminders.
    pub reminders: u32,
}

/// Global loader state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LoaderSlice {
    /// Requests currently in flight.
    pub in_flight: u32,
}

impl LoaderSlice {
    /// Whether the loading indicator should be shown.
    #[must_use]
    pub const fn visible(self) -> bool {
        self.in_flight > 0
    }
}

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Positive confirmation.
    Success,
    /// Failure report.
    Error,
    /// Neutral information.
    Info,
    /// Something needs attention.
    Warning,
}

impl ToastKind {
    /// Title used when the caller does not supply one.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Info => "Info",
            Self::Warning => "Warning",
        }
    }

    /// CSS modifier class.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A transient message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic identifier used for dismissal.
    pub id: u64,
    /// Severity.
    pub kind: ToastKind,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Toast stack, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ToastSlice {
    /// Visible toasts, newest first.
    pub items: Vec<Toast>,
    /// Last identifier handed out.
    pub last_id: u64,
}

/// Convenience accessor for the global store dispatch.
#[must_use]
pub fn app_dispatch() -> Dispatch<AppStore> {
    Dispatch::<AppStore>::new()
}

/// Replace (or clear) the mirrored session.
pub fn set_session(slice: &mut AuthSlice, session: Option<Session>) {
    slice.session = session;
}

/// Count a request as started.
pub const fn begin_request(slice: &mut LoaderSlice) {
    slice.in_flight = slice.in_flight.saturating_add(1);
}

/// Count a request as finished, whatever its outcome.
pub const fn end_request(slice: &mut LoaderSlice) {
    slice.in_flight = slice.in_flight.saturating_sub(1);
}

/// Publish the unread notification count.
pub const fn set_notification_unread(slice: &mut UnreadSlice, count: u32) {
    slice.notifications = count;
}

/// Publish the unread reminder count.
pub const fn set_reminder_unread(slice: &mut UnreadSlice, count: u32) {
    slice.reminders = count;
}

/// Push a toast on top of the stack and return its id.
pub fn push_toast(
    slice: &mut ToastSlice,
    kind: ToastKind,
    message: impl Into<String>,
    title: Option<String>,
) -> u64 {
    slice.last_id += 1;
    let id = slice.last_id;
    slice.items.insert(
        0,
        Toast {
            id,
            kind,
            title: title.unwrap_or_else(|| kind.default_title().to_string()),
            message: message.into(),
        },
    );
    id
}

/// Remove a toast by id; unknown ids are ignored.
pub fn dismiss_toast(slice: &mut ToastSlice, id: u64) {
    slice.items.retain(|toast| toast.id != id);
}

/// Push a success toast through the global store.
pub fn toast_success(message: impl Into<String>) {
    let message = message.into();
    app_dispatch().reduce_mut(|store| {
        push_toast(&mut store.toasts, ToastKind::Success, message, None);
    });
}

/// Push an error toast through the global store.
pub fn toast_error(message: impl Into<String>) {
    let message = message.into();
    app_dispatch().reduce_mut(|store| {
        push_toast(&mut store.toasts, ToastKind::Error, message, None);
    });
}

/// Push an info toast through the global store.
pub fn toast_info(message: impl Into<String>) {
    let message = message.into();
    app_dispatch().reduce_mut(|store| {
        push_toast(&mut store.toasts, ToastKind::Info, message, None);
    });
}

/// Push a warning toast through the global store.
pub fn toast_warning(message: impl Into<String>) {
    let message = message.into();
    app_dispatch().reduce_mut(|store| {
        push_toast(&mut store.toasts, ToastKind::Warning, message, None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_stack_newest_first_with_default_titles() {
        let mut slice = ToastSlice::default();
        let first = push_toast(&mut slice, ToastKind::Success, "Saved", None);
        let second = push_toast(
            &mut slice,
            ToastKind::Error,
            "Nope",
            Some("Upload failed".to_string()),
        );
        assert!(second > first);
        assert_eq!(slice.items[0].id, second);
        assert_eq!(slice.items[0].title, "Upload failed");
        assert_eq!(slice.items[1].title, "Success");

        dismiss_toast(&mut slice, first);
        dismiss_toast(&mut slice, 999);
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].kind, ToastKind::Error);
    }

    #[test]
    fn loader_counts_overlapping_requests() {
        let mut loader = LoaderSlice::default();
        assert!(!loader.visible());
        begin_request(&mut loader);
        begin_request(&mut loader);
        end_request(&mut loader);
        assert!(loader.visible());
        end_request(&mut loader);
        end_request(&mut loader);
        assert!(!loader.visible());
        assert_eq!(loader.in_flight, 0);
    }

    #[test]
    fn unread_counters_are_independent() {
        let mut unread = UnreadSlice::default();
        set_notification_unread(&mut unread, 4);
        set_reminder_unread(&mut unread, 2);
        set_notification_unread(&mut unread, 0);
        assert_eq!(
            unread,
            UnreadSlice {
                notifications: 0,
                reminders: 2
            }
        );
    }

    #[test]
    fn auth_slice_requires_token() {
        let mut slice = AuthSlice::default();
        assert!(!slice.is_authenticated());
        set_session(
            &mut slice,
            Some(Session {
                username: "ada".into(),
                access: "tok".into(),
                refresh: None,
                user: None,
            }),
        );
        assert!(slice.is_authenticated());
        set_session(&mut slice, None);
        assert!(!slice.is_authenticated());
    }
}
