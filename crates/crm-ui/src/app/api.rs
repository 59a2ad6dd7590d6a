//! API client context for sharing a singleton client instance.
//!
//! # Design
//! - Create exactly one API client per app boot.
//! - Client side effects (loader, session, unread counters) land in the yewdux store.

use crate::app::preferences::LocalStorageSessions;
use crate::core::auth::Session;
use crate::core::config::ClientConfig;
use crate::core::store::{
    app_dispatch, begin_request, end_request, set_notification_unread, set_reminder_unread,
    set_session,
};
use crate::services::api::{ApiClient, ClientHooks};
use crate::services::browser::BrowserTransport;
use std::rc::Rc;

/// Shared API client context for UI services.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Wire the browser transport, local-storage sessions and store hooks.
    pub(crate) fn new(config: ClientConfig) -> Self {
        let client = ApiClient::new(
            config,
            Rc::new(BrowserTransport),
            Rc::new(LocalStorageSessions),
        )
        .with_hooks(Rc::new(StoreHooks));
        Self {
            client: Rc::new(client),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Mirrors client events into [`crate::core::store::AppStore`].
struct StoreHooks;

impl ClientHooks for StoreHooks {
    fn request_started(&self) {
        app_dispatch().reduce_mut(|store| begin_request(&mut store.loader));
    }

    fn request_finished(&self) {
        app_dispatch().reduce_mut(|store| end_request(&mut store.loader));
    }

    fn session_changed(&self, session: Option<&Session>) {
        let session = session.cloned();
        app_dispatch().reduce_mut(|store| set_session(&mut store.auth, session));
    }

    fn notifications_unread(&self, count: u32) {
        app_dispatch().reduce_mut(|store| set_notification_unread(&mut store.unread, count));
    }

    fn reminders_unread(&self, count: u32) {
        app_dispatch().reduce_mut(|store| set_reminder_unread(&mut store.unread, count));
    }
}
