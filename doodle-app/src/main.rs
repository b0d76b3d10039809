//! # Dex Doodle
//!
//! Plays a scripted session and exports the gallery.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use doodle_app::{
    export_session, parse_script, AppConfig, CliArgs, ConfirmPolicy, HttpCatalog, RoundDriver,
};
use doodle_core::{GameSession, IdSource, UniformIds};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,doodle_app=debug,doodle_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let mut config = AppConfig::from(args);
    tracing::info!(
        "Starting Dex Doodle: {}x{} canvas, catalog {} ({})",
        config.width,
        config.height,
        config.catalog_url,
        config.language
    );

    let script = match &config.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            // stdin carries the script, so it cannot also carry answers
            if config.confirm == ConfirmPolicy::Ask {
                tracing::warn!("Script read from stdin; unanswered prompts will be declined");
                config.confirm = ConfirmPolicy::AssumeNo;
            }
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };
    let commands = parse_script(&script)?;
    tracing::debug!("Loaded {} script commands", commands.len());

    let catalog = HttpCatalog::with_options(
        &config.catalog_url,
        config.language.clone(),
        config.retry.clone(),
    )?;
    let ids: Box<dyn IdSource + Send> = match config.seed {
        Some(seed) => Box::new(UniformIds::seeded(config.catalog_size, seed)),
        None => Box::new(UniformIds::new(config.catalog_size)),
    };
    let session = GameSession::new(config.width, config.height)?;

    let mut driver = RoundDriver::new(session, Arc::new(catalog), ids);
    let mut confirm = config.confirm.into_confirm();
    driver.run(&commands, confirm.as_mut()).await?;

    let summary = export_session(driver.session(), &config.out_dir)?;
    tracing::info!("Gallery written to {}", summary.page.display());

    Ok(())
}
