use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    build_provider, config, QueryController, RequestState, SettingsOverrides, SystemLinkOpener,
};
use shared::domain::Answer;

/// Ask one legal question from the terminal.
#[derive(Parser, Debug)]
#[command(name = "lexi-cli")]
struct Args {
    /// Question text. Ignored when --example is given.
    query: Option<String>,
    #[arg(long)]
    example: bool,
    /// Open the N-th citation (1-based) in the default browser after answering.
    #[arg(long)]
    open: Option<usize>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    latency_ms: Option<u64>,
}

fn print_answer(answer: &Answer) {
    println!("{}\n", answer.answer);
    for (index, citation) in answer.citations.iter().enumerate() {
        println!("[{}] \"{}\"", index + 1, citation.text);
        match &citation.paragraph {
            Some(paragraph) => println!("    {} ({paragraph})", citation.source),
            None => println!("    {}", citation.source),
        }
        println!("    {}", citation.link);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => config::load_settings_from(path, |name| std::env::var(name).ok()),
        None => config::load_settings(),
    }
    .context("failed to load settings")?;
    settings.apply(&SettingsOverrides {
        endpoint: args.endpoint.clone(),
        timeout_secs: args.timeout_secs,
        latency_ms: args.latency_ms,
    })?;

    let mut controller = QueryController::new();
    if args.example {
        controller.fill_example_query();
    } else {
        controller.set_query(args.query.as_deref().unwrap_or_default());
    }

    let provider = build_provider(&settings);
    let state = controller
        .submit_query(provider.as_ref(), settings.request_timeout)
        .await
        .context("nothing to ask: the query is empty")?;

    let answer = match state {
        RequestState::Succeeded(answer) => answer.clone(),
        RequestState::Failed(err) => bail!("{}", err.user_message()),
        RequestState::Idle | RequestState::Loading { .. } => {
            bail!("answer request did not settle")
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print_answer(&answer);
    }

    if let Some(n) = args.open {
        let Some(citation) = n.checked_sub(1).and_then(|idx| answer.citations.get(idx)) else {
            bail!("no citation #{n}; the answer has {}", answer.citations.len());
        };
        controller.open_citation(citation, &SystemLinkOpener);
    }

    Ok(())
}
