//! HTTP endpoints
//!
//! Every agent and action endpoint validates the user's connection first and
//! fails with 404 instead of blocking on authorization.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use validator::Validate;

use crate::actions;
use crate::agent::run_gmail_agent;
use crate::composio::types::ToolExecutionResponse;
use crate::connection::{self, Bootstrap};
use crate::error::{ConnectionError, GmailAgentError, PlatformError, ValidationError};
use crate::server::models::*;
use crate::server::AppState;

/// Error returned by a handler
#[derive(Debug)]
pub enum ApiError {
    /// A tool ran but reported an error
    ToolFailed(String),

    /// Any other failure
    Agent(GmailAgentError),
}

impl From<GmailAgentError> for ApiError {
    fn from(err: GmailAgentError) -> Self {
        ApiError::Agent(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Agent(errors.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::ToolFailed(error) => (StatusCode::INTERNAL_SERVER_ERROR, json!(error)),
            ApiError::Agent(GmailAgentError::Connection(ConnectionError::NotConnected {
                connection_id,
                redirect_url,
                ..
            })) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "No connected account found for the user id",
                    "connection_id": connection_id,
                    "redirect_url": redirect_url,
                }),
            ),
            ApiError::Agent(GmailAgentError::Validation(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!(e.to_string()))
            }
            ApiError::Agent(
                e @ GmailAgentError::Platform(PlatformError::ConnectionNotFound { .. }),
            ) => (StatusCode::NOT_FOUND, json!(e.to_string())),
            ApiError::Agent(
                e @ (GmailAgentError::Platform(_)
                | GmailAgentError::Llm(_)
                | GmailAgentError::Http(_)),
            ) => {
                tracing::error!("Upstream request failed: {}", e);
                (StatusCode::BAD_GATEWAY, json!(e.to_string()))
            }
            ApiError::Agent(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string()))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Turn a tool result into its `data`, or a 500 carrying the tool's error
fn tool_data(result: ToolExecutionResponse) -> ApiResult<Value> {
    match result.error {
        Some(error) => Err(ApiError::ToolFailed(error)),
        None => Ok(result.data),
    }
}

/// Parse a JSON body that may be left out entirely
fn parse_optional_body<T: serde::de::DeserializeOwned + Default>(body: &[u8]) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        ApiError::Agent(
            ValidationError::InvalidRequest {
                message: e.to_string(),
            }
            .into(),
        )
    })
}

/// Build the router
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/agent", post(run_gmail_agent_endpoint))
        .route("/run_gmail_agent", post(run_gmail_agent_endpoint))
        .route("/connection/create", post(create_connection_endpoint))
        .route("/connection/status", post(connection_status_endpoint))
        .route("/connection/exists", post(connection_exists_endpoint))
        .route("/actions/fetch_emails", post(fetch_emails_endpoint))
        .route("/actions/send_email", post(send_email_endpoint))
        .route("/actions/create_email_draft", post(create_email_draft_endpoint))
        .with_state(state)
}

/// Check the connection without blocking
async fn validate_user_id(state: &AppState, user_id: &str) -> ApiResult<String> {
    let user_id =
        connection::validate_or_bootstrap(state.clients.platform.as_ref(), user_id, Bootstrap::Reject)
            .await?;
    Ok(user_id)
}

// ==================== Agent ====================

async fn run_gmail_agent_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunGmailAgentRequest>,
) -> ApiResult<Json<Vec<ToolExecutionResponse>>> {
    request.validate()?;
    let user_id = validate_user_id(&state, state.user_id(request.user_id.as_deref())).await?;

    let results = run_gmail_agent(
        state.clients.platform.as_ref(),
        state.clients.llm.as_ref(),
        &user_id,
        &request.prompt,
    )
    .await?;

    Ok(Json(results))
}

// ==================== Connections ====================

async fn create_connection_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateConnectionRequest>,
) -> ApiResult<Json<CreateConnectionResponse>> {
    request.validate()?;
    let user_id = state.user_id(request.user_id.as_deref());

    let result = connection::create_connection(
        state.clients.platform.as_ref(),
        user_id,
        request.auth_config_id.as_deref(),
    )
    .await?;

    Ok(Json(CreateConnectionResponse {
        connection_id: result.id,
        redirect_url: result.redirect_url,
    }))
}

async fn connection_status_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConnectionStatusRequest>,
) -> ApiResult<Json<ConnectionStatusResponse>> {
    request.validate()?;

    let status =
        connection::connection_status(state.clients.platform.as_ref(), &request.connection_id)
            .await?;

    Ok(Json(ConnectionStatusResponse { status }))
}

async fn connection_exists_endpoint(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<bool>> {
    let request = parse_optional_body::<ConnectionExistsRequest>(&body)?;
    request.validate()?;
    let user_id = state.user_id(request.user_id.as_deref());

    let exists = connection::account_is_connected(state.clients.platform.as_ref(), user_id).await?;
    Ok(Json(exists))
}

// ==================== Actions ====================

async fn fetch_emails_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchEmailsRequest>,
) -> ApiResult<Json<Value>> {
    request.validate()?;
    let user_id = validate_user_id(&state, state.user_id(request.user_id.as_deref())).await?;

    let result =
        actions::fetch_emails(state.clients.platform.as_ref(), &user_id, request.limit).await?;

    Ok(Json(json!({ "emails": tool_data(result)? })))
}

async fn send_email_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ComposeEmailRequest>,
) -> ApiResult<Json<Value>> {
    request.validate()?;
    let user_id = validate_user_id(&state, state.user_id(request.user_id.as_deref())).await?;

    let result = actions::send_email(
        state.clients.platform.as_ref(),
        &user_id,
        &request.recipient_email,
        &request.subject,
        &request.body,
    )
    .await?;

    Ok(Json(json!({ "message": tool_data(result)? })))
}

async fn create_email_draft_endpoint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ComposeEmailRequest>,
) -> ApiResult<Json<Value>> {
    request.validate()?;
    let user_id = validate_user_id(&state, state.user_id(request.user_id.as_deref())).await?;

    let result = actions::create_email_draft(
        state.clients.platform.as_ref(),
        &user_id,
        &request.recipient_email,
        &request.subject,
        &request.body,
    )
    .await?;

    Ok(Json(json!({ "message": tool_data(result)? })))
}
