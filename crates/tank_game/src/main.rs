//! # tank_game — headless runner
//!
//! ## Startup Sequence
//!
//! 1. Load [`GameConfig`] from the path in the first argument, or from
//!    `TANK_CONFIG`, falling back to defaults.
//! 2. Build the first level and register the systems.
//! 3. Enter the fixed-timestep tick loop.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tank_game::config::{CONFIG_ENV, GameConfig};
use tank_game::tick::TickLoop;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tank_game=info".parse()?))
        .init();

    let path = GameConfig::resolve_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let config = match &path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    info!(
        config = ?path,
        levels = config.levels.len(),
        tick_rate = config.tick_rate,
        "tank game starting"
    );

    let mut tick_loop = TickLoop::new(config).context("building the first level")?;
    let state = tick_loop.run().context("running the tick loop")?;
    tick_loop.shutdown();

    info!(?state, ticks = tick_loop.tick_id(), "tank game finished");
    Ok(())
}
