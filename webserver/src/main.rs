//! EIN names editor server entry point
//!
//! Loads (or migrates) the working-store, then serves the REST editing
//! surface until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use store::{StorePaths, WorkingStore};
use webserver::{EditorServer, RealEditorStore, ServerState, WebServerError, WebServerResult};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "REST editor for EIN sponsor-name records")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Source CSV of EIN → candidate-name rows
    #[arg(long, default_value = "files/unique_ein_spons.csv")]
    source_file: PathBuf,

    /// Directory holding the working CSV and its metadata sidecar
    #[arg(long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Working CSV path (defaults to <storage-dir>/working_data.csv)
    #[arg(long)]
    working_file: Option<PathBuf>,

    /// Allowed CORS origin ("*" allows any)
    #[arg(long, default_value = "*")]
    cors_origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .init();

    let working_file = args
        .working_file
        .unwrap_or_else(|| args.storage_dir.join("working_data.csv"));
    let paths = StorePaths::new(args.source_file.clone(), working_file.clone());

    info!("📂 source file: {}", paths.source_file.display());
    info!("📂 working file: {}", paths.working_file.display());
    info!("📂 metadata file: {}", paths.metadata_file().display());

    let working_store = WorkingStore::open(paths)?;
    info!("✅ working-store ready with {} records", working_store.len());

    let state = ServerState::new(args.source_file, working_file);
    let server = EditorServer::new(state, RealEditorStore::new(working_store))
        .with_cors_origin(Some(args.cors_origin));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::ServerStartup(format!("invalid bind address: {e}")))?;

    server.run(addr).await?;

    info!("server stopped gracefully");
    Ok(())
}
