use thiserror::Error;

use crate::RobotId;

/// Reasons for rejecting a board or a set of starting positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The board size is unsupported or something lies outside of the board.
    #[error("invalid board geometry: {0}")]
    InvalidBoardGeometry(String),
    /// The robots and the goals don't match up.
    #[error("{robots} robots have been placed, but there are {goals} goals for them")]
    RobotCountMismatch {
        /// Number of robots in the starting positions.
        robots: usize,
        /// Number of goals on the board.
        goals: usize,
    },
    /// A robot has been given more than one goal.
    #[error("robot {0} has more than one goal")]
    DuplicateGoal(RobotId),
    /// A direction code in a map is not one of 1 (north), 2 (south), 3 (east) or 4 (west).
    #[error("unknown direction code {0}, expected a value from 1 to 4")]
    UnknownDirectionCode(i64),
}
