//! Solvers for multi robot ricochet puzzles.
//!
//! Every solver explores the joint positions of all robots, starting from the given positions,
//! until each robot sits on its own goal. The solvers only differ in the order positions are
//! expanded in:
//!
//! - [`BreadthFirst`](BreadthFirst) expands positions in the order they were found and always finds
//!   a solution with the fewest moves.
//! - [`DepthFirst`](DepthFirst) always expands the most recently found position.
//! - [`AStar`](AStar) expands the position with the lowest estimated total number of moves first.
//!
//! A found [`Path`](Path) can be replayed on the board to show the position of each robot after
//! every move.

mod a_star;
mod breadth_first;
mod depth_first;
mod replay;
mod search;
pub mod util;

use getset::Getters;
use ricochet_board::{Board, BoardError, Direction, Move, RobotId, RobotPositions};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub use a_star::{AStar, Heuristic};
pub use breadth_first::BreadthFirst;
pub use depth_first::DepthFirst;
pub use replay::{Replay, ReplayStep};
pub use search::{Outcome, Search, SearchLimits, SearchStats};

/// A search strategy which finds a sequence of moves to bring every robot onto its goal.
pub trait Solver {
    /// Searches for a way to get from the `start_positions` to the goals of `board`.
    ///
    /// Fails before searching if the `start_positions` are invalid for the board, see
    /// [`Board::check_positions`](ricochet_board::Board::check_positions).
    fn search(
        &mut self,
        board: &Board,
        start_positions: RobotPositions,
    ) -> Result<Search, BoardError>;

    /// Finds a path from the `start_positions` to the goals.
    ///
    /// Returns `Ok(None)` if no solution has been found.
    fn solve(
        &mut self,
        board: &Board,
        start_positions: RobotPositions,
    ) -> Result<Option<Path>, BoardError> {
        Ok(self.search(board, start_positions)?.into_path())
    }
}

/// A path from a starting position to another position.
///
/// Contains the starting positions of the robots, their final positions and a path from the former
/// to the latter. The path consists of the moves made, each storing the moved robot, the direction
/// and the field it stopped on.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Path {
    start_pos: RobotPositions,
    end_pos: RobotPositions,
    movements: Vec<Move>,
}

impl Path {
    /// Creates a new path containing the starting and final positions of the robots and a path
    /// to reach the final positions.
    ///
    /// The moves aren't checked against a board, use [`Path::replay`](Path::replay) for that.
    pub fn new(start_pos: RobotPositions, end_pos: RobotPositions, movements: Vec<Move>) -> Self {
        debug_assert!(!movements.is_empty() || start_pos == end_pos);
        Self {
            start_pos,
            end_pos,
            movements,
        }
    }

    /// Creates a new path which ends on the starting position.
    pub fn new_start_on_target(start_pos: RobotPositions) -> Self {
        Self::new(start_pos.clone(), start_pos, Vec::new())
    }

    /// Returns the number of moves in the path.
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Checks if the path has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the moves as pairs of robot and direction.
    pub fn directions(&self) -> Vec<(RobotId, Direction)> {
        self.movements
            .iter()
            .map(|movement| (movement.robot(), movement.direction()))
            .collect()
    }
}

/// Error returned when parsing a [`Strategy`](Strategy) or [`Heuristic`](Heuristic) fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

impl ParseVariantError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// See [`BreadthFirst`](BreadthFirst).
    BreadthFirst,
    /// See [`DepthFirst`](DepthFirst).
    DepthFirst,
    /// See [`AStar`](AStar).
    AStar,
}

impl Strategy {
    /// Creates a solver using this strategy.
    ///
    /// The `heuristic` is only used by [`AStar`](AStar).
    pub fn solver(self, limits: SearchLimits, heuristic: Heuristic) -> Box<dyn Solver> {
        match self {
            Strategy::BreadthFirst => Box::new(BreadthFirst::with_limits(limits)),
            Strategy::DepthFirst => Box::new(DepthFirst::with_limits(limits)),
            Strategy::AStar => Box::new(AStar::with_heuristic(heuristic).limits(limits)),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::BreadthFirst
    }
}

impl FromStr for Strategy {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "a-star" | "astar" | "a_star" | "a*" => Ok(Strategy::AStar),
            _ => Err(ParseVariantError::new("strategy", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::AStar => "a-star",
        };
        write!(f, "{}", name)
    }
}
