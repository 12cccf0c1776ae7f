use anyhow::{Context, Result};
use clap::Parser;
use slidecast::config::PlayerConfig;
use slidecast::dispatch::{map_key, Focus};
use slidecast::effects::{FileLoader, LogAlert, LoggingAudio, LoggingRenderer, Player, PlayerEnv};
use slidecast::sync::DeepLink;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Slidecast - step-graph presentation player
///
/// Reads one key per line from stdin: ArrowRight, ArrowLeft, ArrowUp,
/// ArrowDown, Space, r, l, d. `q` or end of input quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Presentation directory or http(s) base URL containing manifest.json
    #[arg(env = "SLIDECAST_PRESENTATION")]
    presentation: Option<String>,

    /// TOML config file (defaults to ./slidecast.toml when present)
    #[arg(short, long, env = "SLIDECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Companion server URL
    #[arg(long, env = "SLIDECAST_SERVER")]
    server: Option<String>,

    /// Full viewer URL or query to start from, e.g. "?step=4&live=0"
    #[arg(long)]
    url: Option<String>,

    /// Step index to start at
    #[arg(long)]
    step: Option<String>,

    /// Recording index to replay
    #[arg(long)]
    live: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "SLIDECAST_LOG")]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<PlayerConfig> {
        let mut config = PlayerConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;
        if let Some(presentation) = self.presentation {
            config.presentation_dir = presentation;
        }
        if let Some(server) = self.server {
            config.server_url = server;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }

        let mut link = self.url.as_deref().map(DeepLink::parse).unwrap_or_default();
        let flags = DeepLink::from_params(self.step.as_deref(), self.live.as_deref());
        link.step = flags.step.or(link.step);
        link.live = flags.live.or(link.live);
        config.deep_link = link;
        Ok(config)
    }
}

fn key_name(line: &str) -> &str {
    match line {
        "Space" | "space" | "" => " ",
        other => other,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    slidecast::telemetry::init(&config.log_level);

    let env = PlayerEnv::new(
        Arc::new(LoggingAudio::new()),
        Arc::new(LoggingRenderer::default()),
        Arc::new(
            FileLoader::with_timeout(config.request_timeout())
                .context("Failed to build the slide loader")?,
        ),
        Arc::new(LogAlert),
    );
    let player = Player::start(&config, env)
        .await
        .with_context(|| format!("Failed to open presentation at {}", config.presentation_dir))?;

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim_end_matches(['\r', '\n']);
            if line == "q" {
                break;
            }
            match map_key(key_name(line), &Focus::Document) {
                Some(action) => {
                    if tx.send(action).await.is_err() {
                        break;
                    }
                }
                None => tracing::debug!(key = line, "unbound key"),
            }
        }
    });

    let session = player.run(rx).await;
    tracing::info!(
        step = %session.current(),
        sound = %session.sound_state(),
        "presentation closed"
    );
    Ok(())
}
