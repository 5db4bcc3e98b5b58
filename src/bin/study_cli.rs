use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use study_helper::{
    config, logging,
    processing::{StudyApi, StudyService},
};

#[derive(Parser)]
#[command(
    name = "study-cli",
    about = "Turn text, YouTube videos, or articles into key points and practice questions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize text from a file, or from stdin when no file is given.
    Text {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Summarize the English transcript of a YouTube video.
    Youtube { url: String },
    /// Summarize the readable text of a web page.
    Website { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(notes) => {
            println!("{notes}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_cli_tracing();
    let service = StudyService::new(config).context("Failed to build study service")?;

    let notes = match cli.command {
        Command::Text { file } => {
            let text = read_input(file)?;
            service.summarize_text(&text).await?
        }
        Command::Youtube { url } => service.summarize_youtube(&url).await?,
        Command::Website { url } => service.summarize_website(&url).await?,
    };
    Ok(notes)
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
