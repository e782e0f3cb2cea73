//! Gmail Agent CLI
//!
//! Runs the Gmail agent once for a user and prompt. If the user has no
//! active Gmail connection, prints the authorization URL and waits for it.

use std::io::Write;
use std::time::Duration;

use clap::Parser;

use gmail_agent::agent::run_gmail_agent;
use gmail_agent::clients::Clients;
use gmail_agent::composio::types::ConnectionRequest;
use gmail_agent::config::{load_env, Config};
use gmail_agent::connection::{validate_or_bootstrap, Bootstrap};
use gmail_agent::error::Result;

/// Gmail Agent
#[derive(Parser)]
#[command(name = "gmail-agent")]
#[command(author, version, about = "Run a natural-language Gmail agent for a user")]
struct Cli {
    /// The user id to run the agent for
    #[arg(long = "user_id", alias = "user-id")]
    user_id: String,

    /// The prompt to run the agent for
    #[arg(long)]
    prompt: String,

    /// Seconds to wait for a new Gmail connection to be authorized
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    load_env();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let clients = Clients::from_config(&config);

    let timeout = cli
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.connection_timeout);

    let user_id = validate_or_bootstrap(
        clients.platform.as_ref(),
        &cli.user_id,
        Bootstrap::Blocking {
            timeout,
            poll_interval: config.poll_interval,
            on_redirect: &prompt_for_authorization,
        },
    )
    .await?;

    let results = run_gmail_agent(
        clients.platform.as_ref(),
        clients.llm.as_ref(),
        &user_id,
        &cli.prompt,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Show the authorization URL on stderr and try to open it in a browser
fn prompt_for_authorization(request: &ConnectionRequest) {
    let mut stderr = std::io::stderr().lock();
    write_authorization_prompt(&mut stderr, request);

    if let Some(url) = request.redirect_url.as_deref() {
        if let Err(e) = open::that(url) {
            let _ = writeln!(stderr, "Could not open browser automatically: {}", e);
        }
        let _ = writeln!(stderr, "Waiting for authorization...");
    }
}

/// Write the authorization banner; stdout is reserved for the JSON results
fn write_authorization_prompt(out: &mut impl Write, request: &ConnectionRequest) {
    let _ = match request.redirect_url.as_deref() {
        Some(url) => writeln!(
            out,
            "\n\n==== Please visit the following URL to connect your account: ====\n{}\n{}",
            url,
            "=".repeat(65)
        ),
        None => writeln!(
            out,
            "Connection {} needs no redirect, waiting for it to activate...",
            request.id
        ),
    };
}
