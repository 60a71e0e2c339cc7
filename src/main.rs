use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing::{info, warn};

use mce_mcp::config::settings::{AuthSettings, LogFormat};
use mce_mcp::docs::bundle::DocsBundle;
use mce_mcp::executor::RequestExecutor;
use mce_mcp::server::tools::MceServer;
use mce_mcp::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the documentation bundle files.
    #[arg(long, env = "MCE_DOCS_DIR", default_value = "docs")]
    docs_dir: PathBuf,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Args + logging (stderr only, stdout is the MCP transport)
    // -------------------------------

    let args = Args::parse();
    logging::init_logging(args.log_level, LogFormat::from_env());

    // -------------------------------
    // 2. Account settings from the environment
    // -------------------------------

    let settings = AuthSettings::from_env();
    if settings.client_id.is_none() || settings.client_secret.is_none() {
        // Credentials are checked per call, so the server still starts and
        // serves health/documentation without them.
        warn!("MCE credentials not fully configured; API tools will report errors");
    }

    // -------------------------------
    // 3. Documentation bundle, loaded once
    // -------------------------------

    let docs = DocsBundle::load(&args.docs_dir);
    if docs.is_empty() {
        warn!(dir = %args.docs_dir.display(), "no documentation files loaded");
    }

    // -------------------------------
    // 4. Serve MCP over stdio
    // -------------------------------

    let server = MceServer::new(RequestExecutor::new(settings), docs);

    info!("mce-mcp serving on stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
