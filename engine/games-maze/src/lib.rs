//! Grid maze game implementation for the planning engine
//!
//! A single agent walks a walled grid eating pellets. Eating the last pellet
//! wins; stepping onto a ghost loses. The crate exists to give planners a
//! small, deterministic, human-readable environment for tests, benchmarks and
//! the runner binary.
//!
//! # Layout format
//!
//! ```text
//! %%%%%%%      %  or #  wall
//! %P . G%      P        start (exactly one)
//! %%%%%%%      .        pellet
//!              G        ghost (touching it loses)
//!              space    open floor
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{BudgetedEnv, Environment};
//! use games_maze::{Maze, Move};
//!
//! let maze = Maze::parse("%%%%%\n%P .%\n%%%%%").unwrap();
//! let start = maze.start_state();
//! let mut env = BudgetedEnv::new(maze, 10);
//!
//! let next = env.step(&start, Move::East).continued().unwrap();
//! assert_eq!(next.food_left(), 1);
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;

use engine_core::Game;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

pub mod layouts;

/// Points per pellet eaten.
const PELLET_SCORE: f64 = 10.0;
/// Bonus or penalty for ending the episode.
const TERMINAL_SCORE: f64 = 500.0;

/// Errors raised while parsing a layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("Layout is empty")]
    Empty,

    #[error("Line {line} has width {actual}, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown tile {tile:?} at line {line}, column {column}")]
    UnknownTile {
        tile: char,
        line: usize,
        column: usize,
    },

    #[error("Layout has no start tile 'P'")]
    MissingStart,

    #[error("Layout has more than one start tile 'P'")]
    MultipleStarts,

    #[error("Layout has {0} pellets, at most 64 are supported")]
    TooManyPellets(usize),
}

/// Maze move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    North,
    South,
    East,
    West,
    Stop,
}

impl Move {
    /// Every move, in the order legal actions are reported.
    pub const ALL: [Move; 5] = [Move::North, Move::South, Move::East, Move::West, Move::Stop];

    /// Row and column offset of this move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::North => (-1, 0),
            Move::South => (1, 0),
            Move::East => (0, 1),
            Move::West => (0, -1),
            Move::Stop => (0, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::North => "North",
            Move::South => "South",
            Move::East => "East",
            Move::West => "West",
            Move::Stop => "Stop",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Floor,
    Ghost,
}

/// Maze game state
///
/// The agent's cell plus a bit mask of the pellets still on the board. Two
/// states are equal exactly when both match, which is what graph search
/// deduplicates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MazeState {
    position: usize,
    food: u64,
}

impl MazeState {
    /// Cell index of the agent (row-major).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Pellets still on the board.
    pub fn food_left(&self) -> u32 {
        self.food.count_ones()
    }
}

/// Maze game implementation
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    /// Cell index of pellet `i` is `pellets[i]`; bit `i` of the food mask.
    pellets: Vec<usize>,
    start: usize,
}

impl Maze {
    /// Parse a layout. Trailing blank lines are ignored.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let last = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .ok_or(MazeError::Empty)?;
        let lines = &lines[..=last];

        let width = lines[0].chars().count();
        let height = lines.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut pellets = Vec::new();
        let mut start = None;

        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(MazeError::Ragged {
                    line: row + 1,
                    expected: width,
                    actual,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = row * width + col;
                let tile = match ch {
                    '%' | '#' => Tile::Wall,
                    ' ' => Tile::Floor,
                    '.' => {
                        pellets.push(cell);
                        Tile::Floor
                    }
                    'G' => Tile::Ghost,
                    'P' => {
                        if start.replace(cell).is_some() {
                            return Err(MazeError::MultipleStarts);
                        }
                        Tile::Floor
                    }
                    other => {
                        return Err(MazeError::UnknownTile {
                            tile: other,
                            line: row + 1,
                            column: col + 1,
                        })
                    }
                };
                tiles.push(tile);
            }
        }

        if pellets.len() > 64 {
            return Err(MazeError::TooManyPellets(pellets.len()));
        }
        let start = start.ok_or(MazeError::MissingStart)?;

        Ok(Self {
            width,
            height,
            tiles,
            pellets,
            start,
        })
    }

    /// Initial state: agent on 'P', every pellet present.
    pub fn start_state(&self) -> MazeState {
        let food = if self.pellets.len() == 64 {
            u64::MAX
        } else {
            (1u64 << self.pellets.len()) - 1
        };
        MazeState {
            position: self.start,
            food,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row and column of a cell index.
    pub fn coords(&self, cell: usize) -> (usize, usize) {
        (cell / self.width, cell % self.width)
    }

    fn manhattan(&self, a: usize, b: usize) -> usize {
        let (ar, ac) = self.coords(a);
        let (br, bc) = self.coords(b);
        ar.abs_diff(br) + ac.abs_diff(bc)
    }

    /// Cell reached by `mv` from `cell`, or None if it is a wall or off the grid.
    fn target(&self, cell: usize, mv: Move) -> Option<usize> {
        let (row, col) = self.coords(cell);
        let (dr, dc) = mv.delta();
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        if row >= self.height || col >= self.width {
            return None;
        }
        let next = row * self.width + col;
        (self.tiles[next] != Tile::Wall).then_some(next)
    }

    /// Cells of the pellets still present in `state`.
    fn remaining_pellets<'a>(&'a self, state: &'a MazeState) -> impl Iterator<Item = usize> + 'a {
        self.pellets
            .iter()
            .enumerate()
            .filter(move |(bit, _)| state.food & (1u64 << bit) != 0)
            .map(|(_, &cell)| cell)
    }

    /// Manhattan distance to the closest remaining pellet (0 if none).
    pub fn nearest_pellet(&self, state: &MazeState) -> usize {
        self.remaining_pellets(state)
            .map(|cell| self.manhattan(state.position, cell))
            .min()
            .unwrap_or(0)
    }

    /// Fewest moves from `state` to a win, by exhaustive breadth-first search
    /// over the full state space without any budget. Reference solver for tests.
    pub fn shortest_win(&self, state: &MazeState) -> Option<usize> {
        let mut seen = HashSet::from([*state]);
        let mut queue = VecDeque::from([(*state, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if self.is_win(&current) {
                return Some(depth);
            }
            if self.is_lose(&current) {
                continue;
            }
            for mv in self.legal_actions(&current) {
                let next = self.advance(&current, mv);
                if seen.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
        None
    }

    /// Deterministic transition shared by `successor` and the reference solver.
    fn advance(&self, state: &MazeState, mv: Move) -> MazeState {
        let position = self.target(state.position, mv).unwrap_or(state.position);
        let mut food = state.food;
        if let Some(bit) = self.pellets.iter().position(|&cell| cell == position) {
            food &= !(1u64 << bit);
        }
        MazeState { position, food }
    }

    /// Render the board with the agent drawn at its position.
    pub fn render(&self, state: &MazeState) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = row * self.width + col;
                let ch = if cell == state.position {
                    'P'
                } else {
                    match self.tiles[cell] {
                        Tile::Wall => '%',
                        Tile::Ghost => 'G',
                        Tile::Floor => {
                            let pellet = self
                                .pellets
                                .iter()
                                .position(|&p| p == cell)
                                .is_some_and(|bit| state.food & (1u64 << bit) != 0);
                            if pellet {
                                '.'
                            } else {
                                ' '
                            }
                        }
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl Game for Maze {
    type State = MazeState;
    type Action = Move;

    fn is_win(&self, state: &MazeState) -> bool {
        state.food == 0 && !self.is_lose(state)
    }

    fn is_lose(&self, state: &MazeState) -> bool {
        self.tiles[state.position] == Tile::Ghost
    }

    fn legal_actions(&self, state: &MazeState) -> Vec<Move> {
        if self.is_terminal(state) {
            return Vec::new();
        }
        Move::ALL
            .into_iter()
            .filter(|&mv| mv == Move::Stop || self.target(state.position, mv).is_some())
            .collect()
    }

    fn all_actions(&self) -> Vec<Move> {
        Move::ALL.to_vec()
    }

    fn successor(&mut self, state: &MazeState, action: Move, _rng: &mut ChaCha20Rng) -> MazeState {
        self.advance(state, action)
    }

    fn evaluate(&self, initial: &MazeState, result: &MazeState) -> f64 {
        let eaten = initial.food_left().saturating_sub(result.food_left());
        let mut score = PELLET_SCORE * f64::from(eaten);
        if self.is_win(result) {
            score += TERMINAL_SCORE;
        } else if self.is_lose(result) {
            score -= TERMINAL_SCORE;
        }
        score - self.nearest_pellet(result) as f64
    }

    /// Admissible: every remaining pellet costs at least one move, and the
    /// farthest one is at least its Manhattan distance away.
    fn heuristic(&self, state: &MazeState) -> f64 {
        let farthest = self
            .remaining_pellets(state)
            .map(|cell| self.manhattan(state.position, cell))
            .max()
            .unwrap_or(0);
        farthest.max(state.food_left() as usize) as f64
    }
}
