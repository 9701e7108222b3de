// Standalone MCP server binary
//
// Protocol traffic goes over stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use veilmail_mcp::server::McpServer;
use veilmail_mcp::tools::Dispatcher;
use veilmail_sdk::{VeilMailClient, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(name = "veilmail-mcp")]
#[command(about = "MCP server for the Veil Mail email API", long_about = None)]
#[command(version)]
struct Args {
    /// Base URL of the Veil Mail API
    #[arg(long, env = "VEILMAIL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Veil Mail API key; tool calls are refused while it is empty
    #[arg(long, env = "VEILMAIL_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veilmail_mcp=info,veilmail_sdk=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("MCP server failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    tracing::info!(base_url = %args.base_url, "Veil Mail MCP server starting...");

    let client = VeilMailClient::builder()
        .base_url(args.base_url)
        .api_key(args.api_key)
        .build()
        .context("Failed to create Veil Mail client")?;

    if !client.has_api_key() {
        tracing::warn!("VEILMAIL_API_KEY is not set; tool calls will be refused");
    }

    let server = McpServer::new(Dispatcher::new(client));
    server.start().await
}
