//! Integration tests for the Gmail agent HTTP service
//!
//! These tests drive the router with in-memory fakes - they don't make real
//! API calls.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use gmail_agent::clients::Clients;
use gmail_agent::composio::types::{ConnectionStatus, ToolExecutionResponse};
use gmail_agent::llm::types::{ChatCompletionResponse, ToolCall};
use gmail_agent::server::api::create_app;
use gmail_agent::server::AppState;
use gmail_agent::testing::{FakeToolPlatform, StubLlm};

struct Harness {
    platform: Arc<FakeToolPlatform>,
    llm: Arc<StubLlm>,
}

impl Harness {
    fn new(platform: FakeToolPlatform) -> Self {
        Self::with_llm(platform, StubLlm::default())
    }

    fn with_llm(platform: FakeToolPlatform, llm: StubLlm) -> Self {
        Self {
            platform: Arc::new(platform),
            llm: Arc::new(llm),
        }
    }

    /// POST `body` to `uri` and return status plus parsed JSON
    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let body: String = body.into();
        let state = Arc::new(AppState::new(
            Clients {
                platform: self.platform.clone(),
                llm: self.llm.clone(),
            },
            "default",
        ));

        let response = create_app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

fn connected(user_id: &str) -> FakeToolPlatform {
    FakeToolPlatform::new().with_account(user_id, "ca_1", ConnectionStatus::Active)
}

mod action_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_emails_default_limit() {
        let harness = Harness::new(connected("u1"));

        let (status, body) = harness
            .post("/actions/fetch_emails", json!({"user_id": "u1"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["emails"]["arguments"]["max_results"], 5);
        assert_eq!(harness.platform.execute_calls()[0].arguments, json!({"max_results": 5}));
    }

    #[tokio::test]
    async fn test_fetch_emails_with_limit() {
        let harness = Harness::new(connected("u1"));

        let (status, _) = harness
            .post("/actions/fetch_emails", json!({"user_id": "u1", "limit": 10}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(harness.platform.execute_calls()[0].arguments["max_results"], 10);
    }

    #[tokio::test]
    async fn test_tool_error_becomes_500_with_error_verbatim() {
        let platform = connected("u1").with_tool_result(
            "GMAIL_FETCH_EMAILS",
            ToolExecutionResponse {
                data: json!({"secret": "should not leak"}),
                error: Some("Gmail quota exceeded".to_string()),
                successful: false,
                log_id: None,
            },
        );
        let harness = Harness::new(platform);

        let (status, body) = harness
            .post("/actions/fetch_emails", json!({"user_id": "u1"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Gmail quota exceeded"}));
    }

    #[tokio::test]
    async fn test_send_email() {
        let harness = Harness::new(connected("u1"));

        let (status, body) = harness
            .post(
                "/actions/send_email",
                json!({
                    "user_id": "u1",
                    "recipient_email": "bob@example.com",
                    "subject": "Hello",
                    "body": "Hi Bob"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"]["tool"], "GMAIL_SEND_EMAIL");
        assert_eq!(
            harness.platform.execute_calls()[0].arguments,
            json!({"recipient_email": "bob@example.com", "subject": "Hello", "body": "Hi Bob"})
        );
    }

    #[tokio::test]
    async fn test_create_email_draft_uses_default_user() {
        let harness = Harness::new(connected("default"));

        let (status, _) = harness
            .post(
                "/actions/create_email_draft",
                json!({
                    "email_recipient": "amy@example.com",
                    "email_subject": "Draft",
                    "email_body": "Later"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let calls = harness.platform.execute_calls();
        assert_eq!(calls[0].user_id, "default");
        assert_eq!(calls[0].slug, "GMAIL_CREATE_EMAIL_DRAFT");
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let harness = Harness::new(connected("u1"));

        let (status, _) = harness
            .post(
                "/actions/send_email",
                json!({"user_id": "u1", "recipient_email": "nope", "subject": "s", "body": "b"}),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(harness.platform.execute_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unconnected_user_gets_404_and_no_tool_call() {
        let harness = Harness::new(FakeToolPlatform::new());

        let (status, body) = harness
            .post("/actions/fetch_emails", json!({"user_id": "u2"}))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"]["error"], "No connected account found for the user id");
        assert!(body["detail"]["redirect_url"].is_string());
        assert_eq!(harness.platform.authorize_calls().len(), 1);
        assert!(harness.platform.execute_calls().is_empty());
    }
}

mod agent_tests {
    use super::*;

    #[tokio::test]
    async fn test_agent_without_tool_calls() {
        let harness = Harness::with_llm(
            connected("u1"),
            StubLlm::new(ChatCompletionResponse::with_tool_calls(vec![])),
        );

        let (status, body) = harness
            .post("/agent", json!({"user_id": "u1", "prompt": "summarize my inbox"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_agent_with_send_email_call() {
        let harness = Harness::with_llm(
            connected("u1"),
            StubLlm::new(ChatCompletionResponse::with_tool_calls(vec![ToolCall::function(
                "call_1",
                "GMAIL_SEND_EMAIL",
                json!({"recipient_email": "bob@x.com", "subject": "hello", "body": "hello"}),
            )])),
        );

        let (status, body) = harness
            .post("/run_gmail_agent", json!({"user_id": "u1", "prompt": "email bob@x.com hello"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["successful"], true);
        assert!(results[0]["error"].is_null());
    }

    #[tokio::test]
    async fn test_agent_llm_failure_is_bad_gateway() {
        let harness = Harness::new(connected("u1"));
        harness.llm.set_failing(true);

        let (status, body) = harness
            .post("/agent", json!({"user_id": "u1", "prompt": "hi"}))
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"].as_str().unwrap().contains("stub configured to fail"));
    }

    #[tokio::test]
    async fn test_agent_missing_prompt() {
        let harness = Harness::new(connected("u1"));

        let (status, _) = harness.post("/agent", json!({"user_id": "u1"})).await;

        assert!(status.is_client_error());
        assert!(harness.llm.requests().is_empty());
    }
}

mod connection_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_connection() {
        let harness = Harness::new(FakeToolPlatform::new());

        let (status, body) = harness
            .post(
                "/connection/create",
                json!({"user_id": "u1", "auth_config_id": "ac_123"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["connection_id"].is_string());
        assert!(body["redirect_url"].as_str().unwrap().starts_with("https://"));

        let calls = harness.platform.authorize_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_id, "u1");
        assert_eq!(calls[0].auth_config_id.as_deref(), Some("ac_123"));
    }

    #[tokio::test]
    async fn test_connection_status() {
        let harness = Harness::new(connected("u1"));

        let (status, body) = harness
            .post("/connection/status", json!({"user_id": "u1", "connection_id": "ca_1"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ACTIVE"}));
    }

    #[tokio::test]
    async fn test_connection_status_unknown_id() {
        let harness = Harness::new(FakeToolPlatform::new());

        let (status, _) = harness
            .post("/connection/status", json!({"connection_id": "ca_missing"}))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_connection_exists() {
        let platform = connected("u1").with_account("u2", "ca_2", ConnectionStatus::Inactive);
        let harness = Harness::new(platform);

        let (_, body) = harness.post("/connection/exists", json!({"user_id": "u1"})).await;
        assert_eq!(body, json!(true));

        let (_, body) = harness.post("/connection/exists", json!({"user_id": "u2"})).await;
        assert_eq!(body, json!(false));

        // An empty body falls back to the default user
        let (status, body) = harness.post("/connection/exists", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(false));
        assert!(harness.platform.authorize_calls().is_empty());
    }

    #[tokio::test]
    async fn test_connection_exists_rejects_bad_body() {
        let harness = Harness::new(connected("default"));

        let (status, _) = harness
            .post("/connection/exists", json!({"user_id": 42}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = harness.post_raw("/connection/exists", "{not json").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // No body at all still means the default user
        let (status, body) = harness.post_raw("/connection/exists", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));
    }
}
