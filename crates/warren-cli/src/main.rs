use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use warren_server::{ServerConfig, StorageBackend};

mod source;

#[derive(Parser)]
#[command(name = "warren")]
#[command(about = "Local and remote feature-toggle chamber management")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendKind {
    Memory,
    File,
}

#[derive(Subcommand)]
enum Command {
    /// Build chambers with inherited toggles into per-node artifacts.
    Build {
        /// Chamber source: a local file path or an http(s) URL.
        #[arg(long, env = "WARREN_CHAMBER")]
        chamber: String,
        /// Directory the `<name>.json` artifacts are written to.
        #[arg(long, default_value = ".", env = "WARREN_OUT_DIR")]
        out_dir: PathBuf,
    },
    /// Serve chambers over the key-path HTTP API.
    Server {
        #[arg(short, long, default_value_t = 8080, env = "WARREN_PORT")]
        port: u16,
        /// Storage backend behind the API.
        #[arg(long, value_enum, default_value_t = BackendKind::Memory, env = "WARREN_STORAGE")]
        storage: BackendKind,
        /// Base directory for the file backend.
        #[arg(long, env = "WARREN_STORAGE_DIR")]
        dir: Option<PathBuf>,
        /// Hard per-request timeout in seconds.
        #[arg(long, default_value_t = 10, env = "WARREN_REQUEST_TIMEOUT_SECS")]
        request_timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { chamber, out_dir } => {
            let mut root = source::load_chamber(&chamber).await?;
            info!(source = %chamber, root = %root.name, "chamber tree loaded");
            warren_core::compile(&mut root, &out_dir)?;
            info!(out_dir = %out_dir.display(), "build complete");
        }
        Command::Server {
            port,
            storage,
            dir,
            request_timeout_secs,
        } => {
            let backend = match storage {
                BackendKind::Memory => StorageBackend::Memory,
                BackendKind::File => {
                    let dir =
                        dir.ok_or_else(|| anyhow::anyhow!("--dir is required for the file backend"))?;
                    StorageBackend::File(dir)
                }
            };

            warren_server::run(ServerConfig {
                port,
                backend,
                request_timeout: Duration::from_secs(request_timeout_secs),
            })
            .await?;
        }
    }

    Ok(())
}
