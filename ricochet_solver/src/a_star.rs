use fxhash::FxBuildHasher;
use priority_queue::PriorityQueue;
use ricochet_board::{Board, BoardError, Goal, RobotPositions};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::search::{explore, Frontier, Search, SearchLimits};
use crate::util::{own_goals, Estimator, LeastMovesBoard};
use crate::{ParseVariantError, Solver};

/// The estimates of the remaining moves an [`AStar`](AStar) solver can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Sums up the manhattan distance of every robot to the closest goal, regardless of which
    /// robot the goal belongs to.
    NearestGoal,
    /// Sums up the manhattan distance of every robot to its own goal.
    OwnGoal,
    /// Sums up the minimal number of moves each robot needs to reach its own goal if it could stop
    /// anywhere, see [`LeastMovesBoard`](LeastMovesBoard).
    LeastMoves,
}

impl Heuristic {
    fn estimator(self, board: &Board, robots: usize) -> Estimator {
        match self {
            Heuristic::NearestGoal => {
                Estimator::NearestGoal(board.goals().iter().map(Goal::position).collect())
            }
            Heuristic::OwnGoal => Estimator::OwnGoal(own_goals(board, robots)),
            Heuristic::LeastMoves => Estimator::LeastMoves(
                own_goals(board, robots)
                    .into_iter()
                    .map(|goal| goal.map(|goal| LeastMovesBoard::new(board, goal)))
                    .collect(),
            ),
        }
    }
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::NearestGoal
    }
}

impl FromStr for Heuristic {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest-goal" | "nearest" => Ok(Heuristic::NearestGoal),
            "own-goal" | "own" => Ok(Heuristic::OwnGoal),
            "least-moves" | "least" => Ok(Heuristic::LeastMoves),
            _ => Err(ParseVariantError::new("heuristic", s)),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Heuristic::NearestGoal => "nearest-goal",
            Heuristic::OwnGoal => "own-goal",
            Heuristic::LeastMoves => "least-moves",
        };
        write!(f, "{}", name)
    }
}

/// A solver using the [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search algorithm to
/// find a path to the goals.
///
/// Positions are expanded in order of the moves needed to reach them plus the estimate of the
/// configured [`Heuristic`](Heuristic). Positions with the same total are expanded in the order
/// they were found. A position is never expanded twice, so the found path is only guaranteed to be
/// optimal if the first path found to every position is a shortest one.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    heuristic: Heuristic,
    limits: SearchLimits,
}

impl AStar {
    /// Creates a new `AStar` solver using the default heuristic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `AStar` solver using `heuristic` to estimate the remaining moves.
    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            limits: SearchLimits::default(),
        }
    }

    /// Stops searching once `limits` are exceeded.
    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the used heuristic.
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }
}

impl Solver for AStar {
    fn search(
        &mut self,
        board: &Board,
        start_positions: RobotPositions,
    ) -> Result<Search, BoardError> {
        let mut open_list = OpenList {
            queue: PriorityQueue::with_capacity_and_hasher(65536, Default::default()),
            estimator: self.heuristic.estimator(board, start_positions.len()),
            sequence: 0,
        };
        explore("AStar", board, start_positions, &mut open_list, &self.limits)
    }
}

/// The not yet expanded positions, ordered by their [`MoveCounter`](MoveCounter).
struct OpenList {
    queue: PriorityQueue<RobotPositions, MoveCounter, FxBuildHasher>,
    estimator: Estimator,
    /// Counts the pushed positions to break ties.
    sequence: u64,
}

impl Frontier for OpenList {
    fn push(&mut self, positions: RobotPositions, moves: usize) {
        let to_target = self.estimator.estimate(&positions);
        let counter = MoveCounter::new(moves, to_target, self.sequence);
        self.sequence += 1;
        self.queue.push(positions, counter);
    }

    fn pop(&mut self) -> Option<(RobotPositions, usize)> {
        self.queue
            .pop()
            .map(|(positions, counter)| (positions, counter.from_start()))
    }
}

/// Used to hold the moves needed to reach a robot position and the estimated number of moves to the
/// goals.
///
/// `MoveCounter`s are ordered from high to low by the estimated total number of moves from the
/// start to the goals. If the totals are the same, the counter pushed first is considered higher in
/// the ordering.
///
/// ```txt
/// MoveCounter(total, sequence)
///
/// MoveCounter(10, 5) < MoveCounter(10, 3) < MoveCounter(5, 7)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MoveCounter {
    // Reordering these fields changes the derived `Ord` and `PartialOrd` implementations.
    total: Reverse<usize>,
    sequence: Reverse<u64>,
    from_start: usize,
}

impl MoveCounter {
    fn new(from_start: usize, to_target: usize, sequence: u64) -> Self {
        Self {
            total: Reverse(from_start + to_target),
            sequence: Reverse(sequence),
            from_start,
        }
    }

    fn from_start(&self) -> usize {
        self.from_start
    }
}
