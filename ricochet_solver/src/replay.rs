use ricochet_board::{Board, Direction, Position, RobotId, RobotPositions};
use std::fmt;

use crate::Path;

/// The state after a single move of a replayed [`Path`](Path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    /// The moved robot.
    pub robot: RobotId,
    /// The direction the robot was moved in.
    pub direction: Direction,
    /// The field the robot stopped on.
    pub position: Position,
    /// Whether the robot stopped on its own goal.
    pub on_goal: bool,
    /// The positions of all robots after the move.
    pub positions: RobotPositions,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Moving robot {} -> {}, final position: {}. On goal: {}",
            self.robot,
            self.direction,
            self.position,
            if self.on_goal { "Yes" } else { "No" }
        )
    }
}

/// Iterator which replays the moves of a path on a board, starting from the path's start
/// positions.
///
/// Every move is resolved again by sliding the robot, the recorded destinations are not used. The
/// replay stops early at the first move of a robot that isn't part of the start positions.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    board: &'a Board,
    path: &'a Path,
    positions: RobotPositions,
    next_move: usize,
}

impl<'a> Replay<'a> {
    /// Checks that every move can be replayed, ends on its recorded destination and that the
    /// replay ends on the final positions of the path.
    pub fn is_consistent(self) -> bool {
        let path = self.path;
        let mut last = path.start_pos().clone();
        let mut replayed = 0;
        for (step, movement) in self.zip(path.movements()) {
            if step.position != movement.destination() {
                return false;
            }
            last = step.positions;
            replayed += 1;
        }
        replayed == path.len() && &last == path.end_pos()
    }
}

impl Iterator for Replay<'_> {
    type Item = ReplayStep;

    fn next(&mut self) -> Option<Self::Item> {
        let movement = self.path.movements().get(self.next_move)?;
        let robot = movement.robot();
        if robot >= self.positions.len() {
            self.next_move = self.path.len();
            return None;
        }
        self.next_move += 1;

        let position = self
            .positions
            .move_robot(self.board, robot, movement.direction());

        Some(ReplayStep {
            robot,
            direction: movement.direction(),
            position,
            on_goal: self.board.is_on_goal(position, robot),
            positions: self.positions.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.path.len() - self.next_move))
    }
}

impl Path {
    /// Replays the path on `board` and yields the state after every move.
    pub fn replay<'a>(&'a self, board: &'a Board) -> Replay<'a> {
        Replay {
            board,
            path: self,
            positions: self.start_pos().clone(),
            next_move: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use ricochet_board::{Board, Direction, Goal, Move, Position, RobotPositions, Wall};

    use crate::{BreadthFirst, Path, Solver};

    fn create_board() -> Board {
        Board::new(
            16,
            16,
            vec![Wall::new(Position::new(0, 7), Direction::South)],
            vec![Goal::new(Position::new(0, 7), 0)],
        )
        .unwrap()
    }

    #[test]
    fn replay_solution() {
        let board = create_board();
        let path = BreadthFirst::new()
            .solve(&board, RobotPositions::from_tuples(&[(2, 3)]))
            .unwrap()
            .unwrap();

        let steps = path.replay(&board).collect::<Vec<_>>();
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0].to_string(),
            "Moving robot 0 -> West, final position: (0, 3). On goal: No"
        );
        assert_eq!(
            steps[1].to_string(),
            "Moving robot 0 -> South, final position: (0, 7). On goal: Yes"
        );
        assert_eq!(&steps[1].positions, path.end_pos());
        assert!(path.replay(&board).is_consistent());
    }

    #[test]
    fn inconsistent_path() {
        let board = create_board();
        let start = RobotPositions::from_tuples(&[(2, 3)]);
        // The robot doesn't stop on (0, 5) when moving south from (0, 3).
        let path = Path::new(
            start,
            RobotPositions::from_tuples(&[(0, 5)]),
            vec![
                Move::new(0, Direction::West, Position::new(0, 3)),
                Move::new(0, Direction::South, Position::new(0, 5)),
            ],
        );
        assert_eq!(path.replay(&board).count(), 2);
        assert!(!path.replay(&board).is_consistent());
    }

    #[test]
    fn unknown_robot() {
        let board = create_board();
        let start = RobotPositions::from_tuples(&[(2, 3)]);
        let path = Path::new(
            start,
            RobotPositions::from_tuples(&[(0, 3)]),
            vec![
                Move::new(0, Direction::West, Position::new(0, 3)),
                Move::new(1, Direction::South, Position::new(0, 7)),
                Move::new(0, Direction::South, Position::new(0, 7)),
            ],
        );

        let steps = path.replay(&board).collect::<Vec<_>>();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].position, Position::new(0, 3));
        assert!(!path.replay(&board).is_consistent());
    }

    #[test]
    fn empty_replay() {
        let board = create_board();
        let path = Path::new_start_on_target(RobotPositions::from_tuples(&[(0, 7)]));
        assert_eq!(path.replay(&board).next(), None);
        assert!(path.replay(&board).is_consistent());
    }
}
