//! Runner - plays maze episodes with a budget-limited planner
//!
//! Each turn the selected planner receives a fresh step budget, searches the
//! maze through the metered environment, and returns the move that is then
//! applied to the real game. Results are logged per episode.

use anyhow::Result;
use clap::Parser;
use engine_core::BudgetedEnv;
use games_maze::Maze;
use planners::build_planner;
use tracing::{error, info};

mod config;
mod episode;

use crate::config::Config;
use crate::episode::{load_maze, play_episode, EpisodeResult};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn run(config: &Config) -> Result<()> {
    let kind = config.planner_kind()?;
    let settings = config.planner_settings();
    let maze = load_maze(&config.maze)?;
    let mut planner = build_planner::<BudgetedEnv<Maze>>(kind, &settings)?;

    info!(
        planner = %kind,
        budget = config.budget,
        maze = %config.maze,
        episodes = config.episodes,
        "Starting run"
    );

    let mut wins = 0;
    for episode in 0..config.episodes {
        let seed = config.seed.wrapping_add(u64::from(episode));
        let report = play_episode(
            maze.clone(),
            planner.as_mut(),
            config.budget,
            config.max_turns,
            seed,
        )?;
        if report.result == EpisodeResult::Won {
            wins += 1;
        }
        info!(
            episode = episode + 1,
            result = %report.result,
            turns = report.turns,
            pellets_left = report.pellets_left,
            "Episode complete"
        );
    }

    info!(wins, episodes = config.episodes, "Run complete");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    match run(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Runner failed: {:#}", e);
            Err(e)
        }
    }
}
