mod logging;
mod render;
mod session;

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use memo_core::{create_history, create_pipeline, MemoConfig, NormalizeError};

use crate::session::Session;

#[derive(Parser)]
#[command(name = "memo-cli")]
#[command(about = "Turn raw interview notes into a structured memo")]
#[command(version)]
struct Cli {
    /// Config file (JSON or TOML); defaults to ~/.memo-normalizer/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model override
    #[arg(long, global = true)]
    model: Option<String>,

    /// Write "不明" for unknown sections instead of omitting them
    #[arg(long, global = true)]
    placeholder_unknown: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one note from a file or stdin
    Normalize {
        /// Read the note from this file instead of stdin
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session with history
    Session,
}

fn load_config(cli: &Cli) -> anyhow::Result<MemoConfig> {
    let mut config = match &cli.config {
        Some(path) => MemoConfig::load_with_file(path)?,
        None => MemoConfig::load(),
    };

    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    if cli.placeholder_unknown {
        config.omit_unknown_fields = false;
    }
    Ok(config)
}

fn read_note(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut note = String::new();
            std::io::stdin()
                .read_to_string(&mut note)
                .context("failed to read stdin")?;
            Ok(note)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    let config = load_config(&cli)?;
    log::debug!(
        "Config: model={}, omit_unknown_fields={}, history_capacity={}",
        config.model_name(),
        config.omit_unknown_fields,
        config.history_capacity
    );

    let pipeline = create_pipeline(&config)?;

    match cli.command {
        Commands::Normalize { file, json } => {
            let note = read_note(file.as_ref())?;
            match pipeline.normalize(&note).await {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => render::print_result(&result),
                Err(err) => {
                    render::print_error(&err);
                    std::process::exit(exit_code(&err));
                }
            }
            Ok(())
        }
        Commands::Session => Session::new(pipeline, create_history(&config)).run().await,
    }
}

fn exit_code(err: &NormalizeError) -> i32 {
    match err {
        NormalizeError::EmptyInput => 2,
        NormalizeError::Generation { .. } => 1,
    }
}
