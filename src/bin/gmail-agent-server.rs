//! Gmail Agent HTTP server

use clap::Parser;

use gmail_agent::config::{load_env, Config};
use gmail_agent::server::run_server;

/// Gmail Agent HTTP server
#[derive(Parser)]
#[command(name = "gmail-agent-server")]
#[command(author, version, about = "Serve the Gmail agent over HTTP")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    load_env();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server(&config, &cli.host, cli.port).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
