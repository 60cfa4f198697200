use ricochet_board::{Board, BoardError, RobotPositions};
use std::collections::VecDeque;

use crate::search::{explore, Frontier, Search, SearchLimits};
use crate::Solver;

/// Finds an optimal solution by visiting all possible game states in order of moves needed to
/// reach them.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirst {
    limits: SearchLimits,
}

impl Solver for BreadthFirst {
    fn search(
        &mut self,
        board: &Board,
        start_positions: RobotPositions,
    ) -> Result<Search, BoardError> {
        let mut queue = Queue(VecDeque::with_capacity(16usize.pow(3)));
        explore("BreadthFirst", board, start_positions, &mut queue, &self.limits)
    }
}

impl BreadthFirst {
    /// Create a new solver which uses a breadth first search to find an optimal solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new solver which stops searching once `limits` are exceeded.
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

/// Positions are expanded first in, first out.
struct Queue(VecDeque<(RobotPositions, usize)>);

impl Frontier for Queue {
    fn push(&mut self, positions: RobotPositions, moves: usize) {
        self.0.push_back((positions, moves));
    }

    fn pop(&mut self) -> Option<(RobotPositions, usize)> {
        self.0.pop_front()
    }
}
