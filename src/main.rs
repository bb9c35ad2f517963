use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use symlens::mcp::McpServer;
use symlens::snapshot::SnapshotIndex;

/// Symbol-query MCP server over a prebuilt code snapshot.
#[derive(Parser)]
#[command(name = "symlens", version, about = "Symbol-query MCP server over a prebuilt code snapshot")]
struct Cli {
    /// Path to the snapshot file produced by the indexing toolchain
    snapshot: PathBuf,
}

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout is reserved for the reply stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> symlens::errors::Result<()> {
    let index = SnapshotIndex::load(&cli.snapshot)?;
    info!(
        snapshot = %cli.snapshot.display(),
        symbols = index.symbol_count(),
        "snapshot loaded"
    );

    let server = Arc::new(McpServer::new(Arc::new(index))?);
    server.run().await
}
