//! Accord CLI entrypoint: score one (theme, guess) pair against a
//! configuration document and print the verdict with its full trace.

use std::sync::Arc;

use anyhow::{Context, bail};

use accord::{HttpModelClient, MatchEngine, ScoringConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (config_path, theme, guess) = match (args.next(), args.next(), args.next()) {
        (Some(config_path), Some(theme), Some(guess)) => (config_path, theme, guess),
        _ => bail!("usage: accord <config.json> <theme> <guess>"),
    };

    let config = ScoringConfig::from_path(&config_path)
        .with_context(|| format!("loading scoring config from {config_path}"))?;
    tracing::info!(config_version = %config.config_version, "configuration loaded");

    let client = Arc::new(HttpModelClient::new(config.network.clone()));
    let engine = MatchEngine::new(config, client)?;

    let result = engine.score(&theme, &guess).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
