//! # scribe
//!
//! Voice transcription server and Wikipedia glossary exporter.
//!
//! ```text
//! scribe serve [--host H] [--port P] [--engine sidecar|whisper] [--strict-formats]
//! scribe glossary fetch [--url U] [--output FILE] [--query Q]
//! scribe glossary search QUERY [--file FILE]
//! ```

#![deny(unsafe_code)]

mod engine_factory;
mod glossary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scribe_server::{ScribeServer, ServerConfig};
use scribe_settings::{EngineKind, ScribeSettings};

use crate::glossary::GlossaryCommand;

/// scribe command line.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about = "Voice transcription server and glossary exporter")]
struct Cli {
    /// Settings file (defaults to `~/.scribe/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP transcription server.
    Serve(ServeArgs),
    /// Export or search the computer science glossary.
    #[command(subcommand)]
    Glossary(GlossaryCommand),
}

/// Flags that override `server.*` and `transcription.*` settings.
#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Host to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Transcription engine.
    #[arg(long, value_parser = parse_engine_arg)]
    engine: Option<EngineKind>,

    /// Reject uploads that are not in `server.acceptedExtensions`.
    #[arg(long)]
    strict_formats: bool,
}

impl ServeArgs {
    fn apply(&self, settings: &mut ScribeSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(engine) = self.engine {
            settings.transcription.engine = engine;
        }
        if self.strict_formats {
            settings.server.strict_formats = true;
        }
    }
}

fn parse_engine_arg(val: &str) -> Result<EngineKind, String> {
    scribe_settings::loader::parse_engine(val)
        .ok_or_else(|| format!("unknown engine `{val}` (expected sidecar or whisper)"))
}

fn load_settings(path: Option<&Path>) -> Result<ScribeSettings> {
    let path = path.map_or_else(scribe_settings::settings_path, Path::to_path_buf);
    scribe_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// The whisper engine decodes through ffmpeg, so `/health` checks it too.
fn server_config(settings: &ScribeSettings) -> ServerConfig {
    let mut config = ServerConfig::from(&settings.server);
    if settings.transcription.engine == EngineKind::Whisper {
        config.decoder = Some(settings.transcription.ffmpeg_path.clone());
    }
    config
}

async fn serve(args: &ServeArgs, mut settings: ScribeSettings) -> Result<()> {
    args.apply(&mut settings);

    if let Some(dir) = &settings.server.upload_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create upload directory: {}", dir.display()))?;
    }

    let transcriber = engine_factory::build_transcriber(&settings.transcription).await?;
    let server = ScribeServer::new(server_config(&settings), transcriber);
    let handle = server.listen().await.context("Failed to bind server")?;

    tracing::info!("scribe listening on http://{}", handle.addr);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server.shutdown().shutdown();
    let _ = handle.task.await;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    scribe_core::logging::init_subscriber(&cli.log_level);

    let settings = load_settings(cli.settings.as_deref())?;
    match cli.command {
        Command::Serve(args) => serve(&args, settings).await,
        Command::Glossary(command) => glossary::run(command, &settings.glossary).await,
    }
}
