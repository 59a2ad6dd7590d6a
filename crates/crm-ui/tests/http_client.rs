//! Service calls over real HTTP against mock backends.
#![cfg(not(target_arch = "wasm32"))]

use crm_api_models::{LeadStage, TokenPair};
use crm_ui::core::auth::{MemorySessionStorage, Session, SessionStorage};
use crm_ui::core::config::ClientConfig;
use crm_ui::services::api::{ApiClient, ClientHooks};
use crm_ui::services::error::ApiError;
use crm_ui::services::leads::{self, LeadQuery};
use crm_ui::services::native::ReqwestTransport;
use crm_ui::services::{auth, notifications};
use httpmock::prelude::*;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct CountingHooks {
    started: Cell<u32>,
    finished: Cell<u32>,
    unread: Cell<Option<u32>>,
}

impl ClientHooks for CountingHooks {
    fn request_started(&self) {
        self.started.set(self.started.get() + 1);
    }

    fn request_finished(&self) {
        self.finished.set(self.finished.get() + 1);
    }

    fn notifications_unread(&self, count: u32) {
        self.unread.set(Some(count));
    }
}

fn client(server: &MockServer, storage: &Rc<MemorySessionStorage>) -> anyhow::Result<ApiClient> {
    let config = ClientConfig::from_base(&server.url("/api/"))?;
    let sessions: Rc<dyn SessionStorage> = storage.clone();
    Ok(ApiClient::new(
        config,
        Rc::new(ReqwestTransport::default()),
        sessions,
    ))
}

fn stored(access: &str, refresh: Option<&str>) -> Rc<MemorySessionStorage> {
    let session = Session {
        refresh: refresh.map(str::to_string),
        ..Session::from_tokens(
            "ada",
            TokenPair {
                access: access.to_string(),
                refresh: String::new(),
            },
        )
    };
    Rc::new(MemorySessionStorage::with_session(session))
}

#[tokio::test]
async fn login_stores_tokens_then_profile() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let token = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token/")
            .json_body(json!({"username": "ada", "password": "secret"}));
        then.status(200)
            .json_body(json!({"access": "a1", "refresh": "r1"}));
    });
    let profile = server.mock(|when, then| {
        when.method(GET)
            .path("/api/users/me/")
            .header("authorization", "Bearer a1");
        then.status(200)
            .json_body(json!({"id": 7, "username": "ada", "is_manager": true}));
    });

    let storage = Rc::new(MemorySessionStorage::default());
    let client = client(&server, &storage)?;
    let session = auth::login(&client, "ada", "secret").await?;

    token.assert();
    profile.assert();
    assert_eq!(session.access, "a1");
    assert_eq!(session.refresh.as_deref(), Some("r1"));
    assert_eq!(storage.load().and_then(|s| s.user).map(|u| u.id), Some(7));
    Ok(())
}

#[tokio::test]
async fn rejected_login_is_not_refreshed() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/token/");
        then.status(401)
            .json_body(json!({"detail": "No active account found with the given credentials"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/token/refresh/");
        then.status(200).json_body(json!({"access": "never"}));
    });

    let storage = Rc::new(MemorySessionStorage::default());
    let client = client(&server, &storage)?;
    let err = auth::login(&client, "ada", "wrong")
        .await
        .expect_err("bad credentials");

    assert!(err.is_unauthorized());
    refresh.assert_calls(0);
    assert!(storage.load().is_none());
    Ok(())
}

#[tokio::test]
async fn expired_access_is_refreshed_and_retried_once() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let stale = server.mock(|when, then| {
        when.method(GET)
            .path("/api/leads/")
            .header("authorization", "Bearer old");
        then.status(401).json_body(json!({"detail": "Token expired"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token/refresh/")
            .json_body(json!({"refresh": "r1"}));
        then.status(200).json_body(json!({"access": "new"}));
    });
    let fresh = server.mock(|when, then| {
        when.method(GET)
            .path("/api/leads/")
            .header("authorization", "Bearer new");
        then.status(200).json_body(json!([]));
    });

    let storage = stored("old", Some("r1"));
    let client = client(&server, &storage)?;
    let rows = leads::list(&client, &LeadQuery::default()).await?;

    assert!(rows.is_empty());
    stale.assert();
    refresh.assert();
    fresh.assert();
    assert_eq!(storage.load().map(|s| s.access), Some("new".to_string()));
    Ok(())
}

#[tokio::test]
async fn unauthorized_retry_is_final_and_signs_out() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let listing = server.mock(|when, then| {
        when.method(GET).path("/api/leads/");
        then.status(401).json_body(json!({"detail": "Forbidden"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/token/refresh/");
        then.status(200).json_body(json!({"access": "new"}));
    });

    let storage = stored("old", Some("r1"));
    let client = client(&server, &storage)?;
    let err = leads::list(&client, &LeadQuery::default())
        .await
        .expect_err("retry still rejected");

    assert!(err.is_unauthorized());
    listing.assert_calls(2);
    refresh.assert();
    assert!(storage.load().is_none());
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_signs_out_without_retry() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let listing = server.mock(|when, then| {
        when.method(GET).path("/api/leads/");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/token/refresh/");
        then.status(401).json_body(json!({"detail": "Token is invalid or expired"}));
    });

    let storage = stored("old", Some("r1"));
    let client = client(&server, &storage)?;
    let err = leads::list(&client, &LeadQuery::default())
        .await
        .expect_err("refresh rejected");

    assert_eq!(
        err,
        ApiError::Status {
            status: 401,
            detail: Some("Token is invalid or expired".to_string()),
        }
    );
    listing.assert();
    refresh.assert();
    assert!(storage.load().is_none());
    Ok(())
}

#[tokio::test]
async fn missing_refresh_token_signs_out() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let listing = server.mock(|when, then| {
        when.method(GET).path("/api/leads/");
        then.status(401);
    });

    let storage = stored("old", None);
    let client = client(&server, &storage)?;
    let err = leads::list(&client, &LeadQuery::default())
        .await
        .expect_err("no refresh token");

    assert_eq!(err, ApiError::NoRefreshToken);
    assert_eq!(err.to_string(), "No refresh token available");
    listing.assert();
    assert!(storage.load().is_none());
    Ok(())
}

#[tokio::test]
async fn transition_posts_stage_and_audit_note() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/leads/5/transition/")
            .header("authorization", "Bearer a1")
            .json_body(json!({"stage": "PROJECT_EXECUTION", "notes": "Moved to Project Execution phase"}));
        then.status(200).json_body(json!({"status": "ok"}));
    });

    let storage = stored("a1", Some("r1"));
    let client = client(&server, &storage)?;
    leads::transition(
        &client,
        5,
        LeadStage::ProjectExecution,
        leads::transition_note(LeadStage::ProjectExecution),
    )
    .await?;

    mock.assert();
    Ok(())
}

#[tokio::test]
async fn csv_export_returns_raw_bytes_for_team_and_search() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/leads/export_csv/")
            .query_param("team", "SALES")
            .query_param("search", "ada");
        then.status(200)
            .header("content-type", "text/csv")
            .body("id,name\n1,Ada Lovelace\n");
    });

    let storage = stored("a1", Some("r1"));
    let client = client(&server, &storage)?;
    let query = LeadQuery {
        team: Some("SALES".to_string()),
        search: Some("ada".to_string()),
        unassigned: true,
        ..LeadQuery::default()
    };
    let bytes = leads::export_csv(&client, &query).await?;

    mock.assert();
    assert_eq!(bytes, b"id,name\n1,Ada Lovelace\n");
    Ok(())
}

#[tokio::test]
async fn polling_skips_loader_and_publishes_unread() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/notifications/unread_count/")
            .header("x-skip-loader", "true");
        then.status(200).json_body(json!({"count": 4}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/notifications/mark_all_read/");
        then.status(500);
    });

    let storage = stored("a1", Some("r1"));
    let hooks = Rc::new(CountingHooks::default());
    let client = client(&server, &storage)?.with_hooks(hooks.clone());

    assert_eq!(notifications::unread_count(&client).await?, 4);
    assert_eq!(hooks.unread.get(), Some(4));
    assert_eq!(hooks.started.get(), 0);

    let failed = notifications::mark_all_read(&client).await;
    assert!(failed.is_err());
    assert_eq!(hooks.unread.get(), Some(4));
    assert_eq!(hooks.started.get(), 1);
    assert_eq!(hooks.finished.get(), 1);
    Ok(())
}
