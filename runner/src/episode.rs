//! Episode loop: one planner decision per turn, applied to the real maze.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use engine_core::{BudgetedEnv, Game, Planner};
use games_maze::{layouts, Maze, MazeState};
use tracing::{debug, info, trace};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeResult {
    Won,
    Lost,
    TurnLimit,
}

impl fmt::Display for EpisodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EpisodeResult::Won => "won",
            EpisodeResult::Lost => "lost",
            EpisodeResult::TurnLimit => "turn limit",
        })
    }
}

/// Summary of a finished episode.
#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub result: EpisodeResult,
    pub turns: u32,
    /// Planner steps spent over the whole episode
    pub steps_used: u64,
    pub pellets_left: u32,
    /// Score of the final state relative to the start
    pub score: f64,
}

/// Resolve a built-in layout name or read a layout file.
pub fn load_maze(source: &str) -> Result<Maze> {
    let layout = match layouts::by_name(source) {
        Some(layout) => layout.to_string(),
        None => std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("'{}' is neither a built-in layout nor a readable file", source))?,
    };
    Maze::parse(&layout).with_context(|| format!("invalid maze layout '{}'", source))
}

/// Play one episode. Every turn the planner gets `budget` fresh steps.
pub fn play_episode<P>(
    maze: Maze,
    planner: &mut P,
    budget: u64,
    max_turns: u32,
    seed: u64,
) -> Result<EpisodeReport>
where
    P: Planner<BudgetedEnv<Maze>> + ?Sized,
{
    let start = maze.start_state();
    let mut state = start;
    let mut env = BudgetedEnv::with_seed(maze, budget, seed);
    let mut turns = 0;
    let mut steps_used = 0;

    while turns < max_turns && !env.game().is_terminal(&state) {
        env.reset_budget(budget);
        let action = planner
            .choose_action(&mut env, &state)
            .with_context(|| format!("{} failed on turn {}", planner.name(), turns + 1))?;
        steps_used += env.budget().used();
        state = env.apply(&state, action);
        turns += 1;

        debug!(
            turn = turns,
            action = %action,
            steps = env.budget().used(),
            pellets_left = state.food_left(),
            "Move applied"
        );
        trace!("\n{}", env.game().render(&state));
    }

    let game = env.game();
    let result = result_of(game, &state);
    let report = EpisodeReport {
        result,
        turns,
        steps_used,
        pellets_left: state.food_left(),
        score: game.evaluate(&start, &state),
    };
    info!(
        planner = planner.name(),
        result = %report.result,
        turns = report.turns,
        steps_used = report.steps_used,
        score = report.score,
        "Episode finished"
    );
    Ok(report)
}

fn result_of(maze: &Maze, state: &MazeState) -> EpisodeResult {
    if maze.is_win(state) {
        EpisodeResult::Won
    } else if maze.is_lose(state) {
        EpisodeResult::Lost
    } else {
        EpisodeResult::TurnLimit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planners::{build_planner, PlannerKind, PlannerSettings};
    use std::io::Write;

    #[test]
    fn test_load_builtin_layout() {
        let maze = load_maze("tiny").unwrap();
        assert_eq!(maze.width(), 7);
    }

    #[test]
    fn test_load_layout_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "%%%%%\n%P .%\n%%%%%").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let maze = load_maze(&path).unwrap();
        assert_eq!(maze.start_state().food_left(), 1);
    }

    #[test]
    fn test_load_missing_layout_fails() {
        let err = load_maze("no-such-maze").unwrap_err();
        assert!(err.to_string().contains("no-such-maze"));
    }

    #[test]
    fn test_astar_wins_tiny_maze() {
        let maze = load_maze("tiny").unwrap();
        let mut planner = build_planner::<BudgetedEnv<Maze>>(
            PlannerKind::AStar,
            &PlannerSettings::default(),
        )
        .unwrap();

        let report = play_episode(maze, planner.as_mut(), 200, 20, 0).unwrap();
        assert_eq!(report.result, EpisodeResult::Won);
        assert_eq!(report.pellets_left, 0);
        assert_eq!(report.turns, 4);
        assert!(report.steps_used <= 200 * 4);
    }

    #[test]
    fn test_turn_limit_ends_episode() {
        let maze = load_maze("small").unwrap();
        let mut planner = build_planner::<BudgetedEnv<Maze>>(
            PlannerKind::Random,
            &PlannerSettings::default(),
        )
        .unwrap();

        let report = play_episode(maze, planner.as_mut(), 10, 1, 0).unwrap();
        assert_eq!(report.turns, 1);
        assert_eq!(report.result, EpisodeResult::TurnLimit);
    }

    #[test]
    fn test_zero_budget_is_an_error() {
        let maze = load_maze("tiny").unwrap();
        let mut planner = build_planner::<BudgetedEnv<Maze>>(
            PlannerKind::Bfs,
            &PlannerSettings::default(),
        )
        .unwrap();

        let err = play_episode(maze, planner.as_mut(), 0, 5, 0).unwrap_err();
        assert!(err.to_string().contains("bfs failed on turn 1"));
    }
}
