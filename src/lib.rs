//! Gmail Agent Library
//!
//! Runs a natural-language Gmail agent: Gmail accounts are connected through
//! the Composio tool platform, and an OpenAI model decides which Gmail tools
//! (fetch, send, draft) to call for a prompt.

pub mod actions;
pub mod agent;
pub mod clients;
pub mod composio;
pub mod config;
pub mod connection;
pub mod error;
pub mod llm;
pub mod server;
pub mod testing;

pub use config::Config;
pub use error::{GmailAgentError, Result};
