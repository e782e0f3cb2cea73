//! HTTP service module
//!
//! Exposes the agent, connection management and Gmail actions as JSON
//! endpoints.

pub mod api;
pub mod models;

use std::sync::Arc;

use crate::clients::Clients;
use crate::config::Config;
use crate::error::Result;

/// State shared by all handlers
pub struct AppState {
    /// Remote clients, built once at startup
    pub clients: Clients,

    /// User id used when a request names none
    pub default_user_id: String,
}

impl AppState {
    pub fn new(clients: Clients, default_user_id: impl Into<String>) -> Self {
        Self {
            clients,
            default_user_id: default_user_id.into(),
        }
    }

    /// The requested user id, or the default
    pub fn user_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_user_id)
    }
}

/// Serve the HTTP API until the process is stopped
pub async fn run_server(config: &Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(
        Clients::from_config(config),
        config.default_user_id.clone(),
    ));
    let app = api::create_app(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
