mod cli;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{failure_json, read_job_text, render_messages, render_questions, Cli, JobSource};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::run_pipeline;
use crate::pipeline::sample::generate_sample_posting;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Logs go to stderr so stdout carries only the results
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting interview-prep v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout())
        .context("Failed to build HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let raw_job_text = match cli.source() {
        JobSource::Sample(role) => generate_sample_posting(&llm, &role)
            .await
            .with_context(|| format!("Failed to generate a sample posting for '{role}'"))?,
        source => read_job_text(&source)?,
    };

    match run_pipeline(&llm, &raw_job_text).await {
        Ok(state) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("{}", render_questions(&state));
                if cli.show_messages {
                    println!("\n{}", render_messages(&state));
                }
            }
            Ok(())
        }
        Err(failure) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&failure_json(&failure))?);
            } else if cli.show_messages {
                println!("{}", render_messages(&failure.state));
            }
            Err(failure.into())
        }
    }
}
