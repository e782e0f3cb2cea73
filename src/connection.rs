//! Gmail connection management
//!
//! Checks whether a user has an active Gmail connection, starts the
//! authorization flow when they don't, and optionally waits for it.

use std::time::Duration;

use crate::composio::types::{ConnectedAccount, ConnectionRequest, ConnectionStatus};
use crate::composio::{ToolPlatform, GMAIL_TOOLKIT};
use crate::error::{ConnectionError, GmailAgentError, Result};

/// What `validate_or_bootstrap` does when the user has no active connection
pub enum Bootstrap<'a> {
    /// Report the redirect URL and wait for authorization to complete
    Blocking {
        timeout: Duration,
        poll_interval: Duration,
        on_redirect: &'a (dyn Fn(&ConnectionRequest) + Send + Sync),
    },

    /// Fail with [`ConnectionError::NotConnected`] right away
    Reject,
}

/// True iff the user has at least one active Gmail connection
pub async fn account_is_connected(platform: &dyn ToolPlatform, user_id: &str) -> Result<bool> {
    let accounts = platform
        .list_connected_accounts(user_id, GMAIL_TOOLKIT)
        .await?;

    for account in &accounts {
        if account.status.is_active() {
            return Ok(true);
        }
        tracing::warn!(
            account_id = %account.id,
            status = %account.status,
            user_id,
            "Inactive account found"
        );
    }

    Ok(false)
}

/// Start a Gmail authorization flow for a user
pub async fn create_connection(
    platform: &dyn ToolPlatform,
    user_id: &str,
    auth_config_id: Option<&str>,
) -> Result<ConnectionRequest> {
    platform
        .authorize(user_id, GMAIL_TOOLKIT, auth_config_id)
        .await
}

/// Current status of a connection
pub async fn connection_status(
    platform: &dyn ToolPlatform,
    connection_id: &str,
) -> Result<ConnectionStatus> {
    Ok(platform.get_connected_account(connection_id).await?.status)
}

/// First auth config registered for the Gmail toolkit
pub async fn fetch_auth_config_id(platform: &dyn ToolPlatform) -> Result<Option<String>> {
    Ok(platform
        .list_auth_configs(GMAIL_TOOLKIT)
        .await?
        .into_iter()
        .next()
        .map(|c| c.id))
}

/// Poll a connection until it becomes active.
///
/// Fails on `FAILED`/`EXPIRED`, or once `timeout` has elapsed.
pub async fn wait_for_connection(
    platform: &dyn ToolPlatform,
    connection_id: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ConnectedAccount> {
    let poll = async {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;

            let account = platform.get_connected_account(connection_id).await?;
            if account.status.is_active() {
                return Ok::<_, GmailAgentError>(account);
            }
            if account.status.is_terminal_failure() {
                return Err(GmailAgentError::from(ConnectionError::AuthorizationFailed {
                    connection_id: connection_id.to_string(),
                    status: account.status.to_string(),
                }));
            }
            tracing::debug!(connection_id, status = %account.status, "Waiting for connection");
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result,
        Err(_) => Err(ConnectionError::Timeout {
            connection_id: connection_id.to_string(),
            waited_secs: timeout.as_secs(),
        }
        .into()),
    }
}

/// Return `user_id` if it has an active connection, otherwise start one.
///
/// A connection is created at most once per call. What happens next depends
/// on `mode`; see [`Bootstrap`].
pub async fn validate_or_bootstrap(
    platform: &dyn ToolPlatform,
    user_id: &str,
    mode: Bootstrap<'_>,
) -> Result<String> {
    if account_is_connected(platform, user_id).await? {
        return Ok(user_id.to_string());
    }

    let request = create_connection(platform, user_id, None).await?;
    tracing::info!(user_id, connection_id = %request.id, "No active connection, authorization started");

    match mode {
        Bootstrap::Blocking {
            timeout,
            poll_interval,
            on_redirect,
        } => {
            on_redirect(&request);
            wait_for_connection(platform, &request.id, timeout, poll_interval).await?;
            tracing::info!(user_id, connection_id = %request.id, "Connection active");
            Ok(user_id.to_string())
        }
        Bootstrap::Reject => Err(ConnectionError::NotConnected {
            user_id: user_id.to_string(),
            connection_id: request.id,
            redirect_url: request.redirect_url,
        }
        .into()),
    }
}
