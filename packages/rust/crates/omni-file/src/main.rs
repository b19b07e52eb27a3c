//! omni-file CLI: write lines to a file, or stream a file's lines to stdout.
//!
//! Logging: set `RUST_LOG=omni_file=debug` to see handle events on stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use omni_file::{FileHandle, HandleConfig, OpenMode};

#[derive(Debug, Parser)]
#[command(name = "omni-file", about = "Line-oriented file handle tool")]
struct Cli {
    /// JSON file with handle settings (see `HandleConfig`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Trace every line read.
    #[arg(long, global = true)]
    trace_lines: bool,

    /// Skip syncing written data on close.
    #[arg(long, global = true)]
    no_sync_on_close: bool,

    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write each argument as a line.
    Write {
        path: PathBuf,
        #[arg(required = true)]
        lines: Vec<String>,
        /// a, w, r+ or w+
        #[arg(long, default_value = "a")]
        mode: OpenMode,
    },
    /// Print every line of a file.
    Cat { path: PathBuf },
}

impl Cli {
    fn handle_config(&self) -> anyhow::Result<HandleConfig> {
        let mut config = match &self.config {
            Some(path) => HandleConfig::from_json_file(path)?,
            None => HandleConfig::default(),
        };
        if self.trace_lines {
            config.trace_lines = true;
        }
        if self.no_sync_on_close {
            config.sync_on_close = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_file=debug"
        } else {
            "omni_file=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut handle = FileHandle::with_config(cli.handle_config()?);

    match cli.command {
        Command::Write { path, lines, mode } => {
            anyhow::ensure!(mode.is_writable(), "mode {mode} cannot write");
            handle.open(&path, mode)?;
            let mut total = 0;
            for line in &lines {
                total += handle.write_to_file(line)?;
            }
            handle.close()?;
            println!("{total}");
        }
        Command::Cat { path } => {
            handle.open(&path, OpenMode::Read)?;
            {
                let mut stream = handle.read_lines()?;
                while let Some(line) = stream.next().await {
                    println!("{}", line.context("reading lines")?);
                }
            }
            handle.close()?;
        }
    }

    Ok(())
}
