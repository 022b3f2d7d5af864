use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use doxibox::{ConfigOverrides, InputMode, run_pipeline};

/// Doxibox - wake-word voice assistant
#[derive(Parser)]
#[command(name = "doxibox", version, about)]
struct Cli {
    /// Text prompts treated as captured utterances (text mode)
    prompts: Vec<String>,

    /// Capture utterances from the microphone instead of prompts
    #[arg(long, env = "DOXIBOX_MIC")]
    mic: bool,

    /// Enable agent mode with a visible reasoning trace
    #[arg(long, env = "DOXIBOX_AGENT")]
    agent: bool,

    /// Path to a TOML config overlay (defaults to the platform config dir)
    #[arg(long, env = "DOXIBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,doxibox=info",
        1 => "info,doxibox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut overrides = match &cli.config {
        Some(path) => ConfigOverrides::load_file(path)?,
        None => ConfigOverrides::load_default_file()?.unwrap_or_default(),
    };
    if cli.agent {
        overrides.enable_agent_mode = Some(true);
    }
    if cli.mic {
        overrides.input_mode = Some(InputMode::Microphone);
    }

    let prompts = if cli.prompts.is_empty() {
        None
    } else {
        Some(cli.prompts)
    };

    let history = run_pipeline(prompts, Some(overrides)).await?;
    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(())
}
