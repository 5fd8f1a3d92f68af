//! Headless client: plays a scenario and prints the turn history as JSON.
mod config;

use anyhow::{Context, Result};
use tactics_runtime::{
    AggressiveController, Event, PacingConfig, Runtime, Scenario, SkipController, Topic,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{CliConfig, ControllerKind};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    setup_logging(&config.log_filter)?;

    let scenario = Scenario::load_from_file(&config.scenario)
        .with_context(|| format!("loading scenario {}", config.scenario.display()))?;
    let pacing = if config.instant {
        PacingConfig::instant()
    } else {
        PacingConfig::default()
    };

    let mut runtime = Runtime::builder()
        .pacing(pacing)
        .scenario(&scenario)?
        .build()
        .await?;
    match config.controller {
        ControllerKind::Aggressive => runtime.set_controller(AggressiveController),
        ControllerKind::Skip => runtime.set_controller(SkipController),
    }

    let mut map_rx = runtime.subscribe(Topic::Map);
    let played = runtime.run(config.rounds).await?;
    tracing::info!(scenario = %scenario.name, played, "Run finished");

    while let Ok(event) = map_rx.try_recv() {
        if let Event::MapExit { position, target } = event {
            tracing::info!(%position, %target, "Player reached a map exit");
        }
    }

    let history = runtime.handle().history().await?;
    println!("{}", serde_json::to_string_pretty(&history)?);

    runtime.shutdown().await?;
    Ok(())
}

/// Setup logging to stderr so stdout stays machine-readable
fn setup_logging(filter: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .with_context(|| format!("invalid log filter {filter:?}"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
