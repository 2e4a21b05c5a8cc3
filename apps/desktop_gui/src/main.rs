mod backend_bridge;
mod controller;
mod ui;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use client_core::{build_provider, config, Settings, SettingsOverrides, SystemLinkOpener};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::{commands::BackendCommand, runtime::BackendConfig};
use crate::controller::events::UiEvent;

#[derive(Parser, Debug)]
#[command(name = "lexi", about = "Lexi Legal Assistant desktop app")]
struct Args {
    /// Settings file; defaults to ./lexi.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Answer service endpoint. Omit to use the built-in canned answer.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    latency_ms: Option<u64>,
}

fn resolve_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => config::load_settings_from(path, |name| std::env::var(name).ok()),
        None => config::load_settings(),
    }?;
    settings.apply(&SettingsOverrides {
        endpoint: args.endpoint.clone(),
        timeout_secs: args.timeout_secs,
        latency_ms: args.latency_ms,
    })?;
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args).context("failed to load settings")?;
    tracing::info!(
        timeout_secs = settings.request_timeout.as_secs(),
        "starting Lexi desktop app"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        BackendConfig {
            provider: build_provider(&settings),
            opener: Arc::new(SystemLinkOpener),
            request_timeout: settings.request_timeout,
        },
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Lexi Legal Assistant")
            .with_inner_size([960.0, 820.0])
            .with_min_inner_size([560.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Lexi Legal Assistant",
        options,
        Box::new(|_cc| Ok(Box::new(ui::DesktopGuiApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop app exited with error: {err}"))
}
