//! Scripted transport and recording hooks for service tests.

use crate::core::auth::{MemorySessionStorage, Session, SessionStorage};
use crate::core::config::ClientConfig;
use crate::services::api::{ApiClient, ClientHooks};
use crate::services::error::ApiError;
use crate::services::http::{ApiResponse, HttpRequest, Method, RequestBody, Transport};
use async_trait::async_trait;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Request as observed by [`ScriptedTransport`].
#[derive(Clone, Debug)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub authorization: Option<String>,
    pub skip_loader: bool,
    pub body: RequestBody,
}

impl RecordedCall {
    pub(crate) fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            RequestBody::Json(bytes) => serde_json::from_slice(bytes).ok(),
            _ => None,
        }
    }
}

/// Transport replaying queued responses in order.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub(crate) fn push(&self, response: ApiResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest<'_>) -> Result<ApiResponse, ApiError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: request.method,
            url: request.url.to_string(),
            authorization: request.header("Authorization").map(str::to_string),
            skip_loader: request.header("X-Skip-Loader").is_some(),
            body: request.body.clone(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
    }
}

/// Hooks that remember every event.
#[derive(Default)]
pub(crate) struct RecordingHooks {
    started: Cell<u32>,
    finished: Cell<u32>,
    sessions: RefCell<Vec<Option<String>>>,
    notifications: RefCell<Vec<u32>>,
    reminders: RefCell<Vec<u32>>,
}

impl RecordingHooks {
    pub(crate) fn started(&self) -> u32 {
        self.started.get()
    }

    pub(crate) fn finished(&self) -> u32 {
        self.finished.get()
    }

    /// Access token of the last published session (`Some(None)` after a sign-out).
    pub(crate) fn last_session(&self) -> Option<Option<String>> {
        self.sessions.borrow().last().cloned()
    }

    pub(crate) fn notifications(&self) -> Vec<u32> {
        self.notifications.borrow().clone()
    }

    pub(crate) fn reminders(&self) -> Vec<u32> {
        self.reminders.borrow().clone()
    }
}

impl ClientHooks for RecordingHooks {
    fn request_started(&self) {
        self.started.set(self.started.get() + 1);
    }

    fn request_finished(&self) {
        self.finished.set(self.finished.get() + 1);
    }

    fn session_changed(&self, session: Option<&Session>) {
        self.sessions
            .borrow_mut()
            .push(session.map(|session| session.access.clone()));
    }

    fn notifications_unread(&self, count: u32) {
        self.notifications.borrow_mut().push(count);
    }

    fn reminders_unread(&self, count: u32) {
        self.reminders.borrow_mut().push(count);
    }
}

/// Client wired to a scripted transport and in-memory session.
pub(crate) struct Harness {
    pub client: ApiClient,
    pub transport: Rc<ScriptedTransport>,
    pub sessions: Rc<MemorySessionStorage>,
    pub hooks: Rc<RecordingHooks>,
}

impl Harness {
    pub(crate) fn new(session: Option<Session>) -> Self {
        let transport = Rc::new(ScriptedTransport::default());
        let sessions = Rc::new(MemorySessionStorage::default());
        if let Some(session) = session {
            sessions.save(&session);
        }
        let hooks = Rc::new(RecordingHooks::default());
        let config = ClientConfig::from_base("http://api.test/api/").expect("test config");
        let client = ApiClient::new(config, transport.clone(), sessions.clone())
            .with_hooks(hooks.clone());
        Self {
            client,
            transport,
            sessions,
            hooks,
        }
    }
}

pub(crate) fn session(access: &str, refresh: Option<&str>) -> Session {
    Session {
        username: "ada".to_string(),
        access: access.to_string(),
        refresh: refresh.map(str::to_string),
        user: None,
    }
}

pub(crate) fn json_response<T: Serialize>(status: u16, body: &T) -> ApiResponse {
    ApiResponse {
        status,
        body: serde_json::to_vec(body).expect("serialise test body"),
    }
}
