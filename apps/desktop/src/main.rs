use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::parse_endpoint, load_settings, view, HttpSentimentBackend, SentimentRequestController,
    SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "sentiment", about = "Classify text as Positive or Negative")]
struct Args {
    /// Classifier endpoint, overriding sentiment.toml and the environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Text to analyze. Reads lines from stdin when omitted.
    text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = parse_endpoint(endpoint)?;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    let backend =
        HttpSentimentBackend::from_settings(&settings).context("failed to build http client")?;
    tracing::debug!(endpoint = %backend.endpoint(), "sentiment client ready");
    let controller = SentimentRequestController::new(backend);

    match args.text {
        Some(text) => {
            controller.set_text(text);
            let outcome = controller.submit().await;
            if outcome != SubmitOutcome::Skipped {
                println!("{}", render::outcome(&outcome));
            }
            Ok(match outcome {
                SubmitOutcome::Failed(_) => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
        None => {
            interactive(&controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn interactive(controller: &SentimentRequestController<HttpSentimentBackend>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}\n{}\n", view::TITLE, view::SUBTITLE).as_bytes())
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        controller.set_text(line);
        let outcome = controller.submit().await;
        if outcome == SubmitOutcome::Skipped {
            continue;
        }
        stdout
            .write_all(format!("{}\n", render::outcome(&outcome)).as_bytes())
            .await?;
    }
    Ok(())
}
