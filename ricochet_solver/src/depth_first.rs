use ricochet_board::{Board, BoardError, RobotPositions};

use crate::search::{explore, Frontier, Search, SearchLimits};
use crate::Solver;

/// Finds a solution by always expanding the most recently found game state.
///
/// The found path is usually far from optimal. Since every position is visited at most once, the
/// search still terminates on every board.
#[derive(Debug, Clone, Default)]
pub struct DepthFirst {
    limits: SearchLimits,
}

impl Solver for DepthFirst {
    fn search(
        &mut self,
        board: &Board,
        start_positions: RobotPositions,
    ) -> Result<Search, BoardError> {
        let mut stack = Stack(Vec::with_capacity(1024));
        explore("DepthFirst", board, start_positions, &mut stack, &self.limits)
    }
}

impl DepthFirst {
    /// Create a new solver which uses a depth first search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new solver which stops searching once `limits` are exceeded.
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

/// Positions are expanded last in, first out.
struct Stack(Vec<(RobotPositions, usize)>);

impl Frontier for Stack {
    fn push(&mut self, positions: RobotPositions, moves: usize) {
        self.0.push((positions, moves));
    }

    fn pop(&mut self) -> Option<(RobotPositions, usize)> {
        self.0.pop()
    }
}

#[cfg(test)]
mod tests {
    use ricochet_board::{Board, Direction, Goal, Position, RobotPositions, Wall};

    use super::DepthFirst;
    use crate::{Outcome, SearchLimits, Solver};

    #[test]
    fn newest_position_first() {
        // The last generated move of the only robot is West, so the robot is moved West first and
        // reaches the goal without looking at (2, 0).
        let board = Board::new(
            3,
            3,
            vec![Wall::new(Position::new(0, 1), Direction::North)],
            vec![Goal::new(Position::new(0, 1), 0)],
        )
        .unwrap();
        let start = RobotPositions::from_tuples(&[(2, 2)]);

        let search = DepthFirst::new().search(&board, start).unwrap();
        assert_eq!(search.stats.expanded, 2);
        let path = search.path().unwrap();
        assert_eq!(
            path.directions(),
            vec![(0, Direction::West), (0, Direction::North)]
        );
        assert_eq!(path.end_pos(), &RobotPositions::from_tuples(&[(0, 1)]));
    }

    #[test]
    fn limited() {
        let board = Board::new(16, 16, vec![], vec![Goal::new(Position::new(7, 0), 0)]).unwrap();
        let start = RobotPositions::from_tuples(&[(0, 0)]);
        let limits = SearchLimits::unlimited().with_max_expansions(2);

        let search = DepthFirst::with_limits(limits).search(&board, start).unwrap();
        assert_eq!(search.outcome, Outcome::LimitReached);
        assert_eq!(search.stats.expanded, 2);
    }
}
