//! Taleloom: an illustrated, branching text adventure in the terminal.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tl_backend::{BackendConfig, GeminiBackend};
use tl_session::{GameSession, SessionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taleloom",
    about = "Play an AI-narrated, illustrated text adventure in the terminal",
    version
)]
struct Args {
    /// Model used to write the story
    #[arg(long)]
    text_model: Option<String>,

    /// Model used to paint the illustrations
    #[arg(long)]
    image_model: Option<String>,

    /// Sampling temperature for the story (0.0-2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Give up on a backend request after this many seconds
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// Only send the most recent N turns as story context
    #[arg(long, value_name = "N")]
    max_transcript_turns: Option<usize>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    // Fail on a missing credential before the terminal is taken over.
    let mut config = BackendConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(model) = args.text_model {
        config = config.with_text_model(model);
    }
    if let Some(model) = args.image_model {
        config = config.with_image_model(model);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    config = config.with_request_timeout(args.request_timeout.map(Duration::from_secs));

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let backend = GeminiBackend::new(config).map_err(|e| e.to_string())?;
    let session = GameSession::new(SessionConfig::default().with_max_transcript_turns(
        args.max_transcript_turns,
    ));
    tracing::info!(session_id = %session.id(), "starting taleloom");

    let runtime = tokio::runtime::Runtime::new().map_err(|e| format!("runtime error: {e}"))?;
    let app = tl_tui::app::TuiApp::new(session, Arc::new(backend), runtime.handle().clone());

    tl_tui::terminal::run(app)
}

/// Send tracing output to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
