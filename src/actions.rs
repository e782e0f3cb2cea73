//! Gmail tool actions
//!
//! Each action executes one remote Gmail tool with a fixed argument mapping
//! and returns the platform's result unchanged.

use serde_json::json;

use crate::composio::types::ToolExecutionResponse;
use crate::composio::ToolPlatform;
use crate::error::Result;

/// Remote tool slugs
pub mod slugs {
    pub const FETCH_EMAILS: &str = "GMAIL_FETCH_EMAILS";
    pub const SEND_EMAIL: &str = "GMAIL_SEND_EMAIL";
    pub const CREATE_EMAIL_DRAFT: &str = "GMAIL_CREATE_EMAIL_DRAFT";

    /// Tools offered to the agent
    pub const AGENT_TOOLS: [&str; 3] = [FETCH_EMAILS, SEND_EMAIL, CREATE_EMAIL_DRAFT];
}

/// Emails fetched when no limit is given
pub const DEFAULT_FETCH_LIMIT: u32 = 5;

/// Fetch up to `limit` emails from the user's inbox
pub async fn fetch_emails(
    platform: &dyn ToolPlatform,
    user_id: &str,
    limit: Option<u32>,
) -> Result<ToolExecutionResponse> {
    let limit = limit.unwrap_or(DEFAULT_FETCH_LIMIT);
    platform
        .execute_tool(user_id, slugs::FETCH_EMAILS, json!({ "max_results": limit }))
        .await
}

/// Send an email
pub async fn send_email(
    platform: &dyn ToolPlatform,
    user_id: &str,
    recipient_email: &str,
    subject: &str,
    body: &str,
) -> Result<ToolExecutionResponse> {
    platform
        .execute_tool(
            user_id,
            slugs::SEND_EMAIL,
            json!({
                "recipient_email": recipient_email,
                "subject": subject,
                "body": body,
            }),
        )
        .await
}

/// Create an email draft
pub async fn create_email_draft(
    platform: &dyn ToolPlatform,
    user_id: &str,
    recipient_email: &str,
    subject: &str,
    body: &str,
) -> Result<ToolExecutionResponse> {
    platform
        .execute_tool(
            user_id,
            slugs::CREATE_EMAIL_DRAFT,
            json!({
                "recipient_email": recipient_email,
                "subject": subject,
                "body": body,
            }),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeToolPlatform;

    #[tokio::test]
    async fn test_fetch_emails_maps_limit() {
        let platform = FakeToolPlatform::new();
        fetch_emails(&platform, "u1", Some(10)).await.unwrap();

        let calls = platform.execute_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].slug, "GMAIL_FETCH_EMAILS");
        assert_eq!(calls[0].user_id, "u1");
        assert_eq!(calls[0].arguments, json!({"max_results": 10}));
    }

    #[tokio::test]
    async fn test_fetch_emails_default_limit() {
        let platform = FakeToolPlatform::new();
        fetch_emails(&platform, "u1", None).await.unwrap();

        assert_eq!(platform.execute_calls()[0].arguments["max_results"], 5);
    }

    #[tokio::test]
    async fn test_send_and_draft_map_arguments() {
        let platform = FakeToolPlatform::new();
        send_email(&platform, "u1", "bob@x.com", "Hello", "Hi Bob").await.unwrap();
        create_email_draft(&platform, "u1", "amy@x.com", "Draft", "Later").await.unwrap();

        let calls = platform.execute_calls();
        assert_eq!(calls[0].slug, "GMAIL_SEND_EMAIL");
        assert_eq!(
            calls[0].arguments,
            json!({"recipient_email": "bob@x.com", "subject": "Hello", "body": "Hi Bob"})
        );
        assert_eq!(calls[1].slug, "GMAIL_CREATE_EMAIL_DRAFT");
        assert_eq!(
            calls[1].arguments,
            json!({"recipient_email": "amy@x.com", "subject": "Draft", "body": "Later"})
        );
    }

    #[tokio::test]
    async fn test_tool_error_is_returned_as_data() {
        let platform = FakeToolPlatform::new().with_tool_result(
            slugs::SEND_EMAIL,
            ToolExecutionResponse::failure("recipient rejected"),
        );

        let result = send_email(&platform, "u1", "bad", "s", "b").await.unwrap();
        assert_eq!(result.error.as_deref(), Some("recipient rejected"));
    }
}
