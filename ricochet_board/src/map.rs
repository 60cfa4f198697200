//! Load boards and starting positions from JSON map files.
//!
//! A map file contains the walls as records of the form `{"x_pos": 2, "y_pos": 2, "direction": 1}`
//! where the direction is encoded as `1` (north), `2` (south), `3` (east) or `4` (west). A complete
//! puzzle additionally lists the goals and the starting positions of the robots:
//!
//! ```json
//! {
//!     "width": 16,
//!     "height": 16,
//!     "walls": [{ "x_pos": 2, "y_pos": 2, "direction": 1 }],
//!     "goals": [{ "x": 0, "y": 7, "robot_id": 0, "color": "red" }],
//!     "robots": [[2, 3]]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::convert::{TryFrom, TryInto};
use thiserror::Error;

use crate::{
    Board, BoardError, Direction, Goal, Position, PositionEncoding, RobotId, RobotPositions, Wall,
    MAX_SIDE_LENGTH,
};

/// The side length used if a puzzle doesn't state its size.
pub const DEFAULT_SIDE_LENGTH: PositionEncoding = 16;

/// Errors while reading a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The document isn't valid JSON or doesn't have the expected shape.
    #[error("malformed map: {0}")]
    Json(#[from] serde_json::Error),
    /// The document describes an invalid board.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A wall as stored in a map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallRecord {
    /// Column of the field the wall is attached to.
    pub x_pos: i64,
    /// Row of the field the wall is attached to.
    pub y_pos: i64,
    /// Side of the field, `1` (north), `2` (south), `3` (east) or `4` (west).
    pub direction: i64,
}

/// A goal as stored in a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Column of the goal.
    pub x: i64,
    /// Row of the goal.
    pub y: i64,
    /// The robot which has to reach the goal.
    pub robot_id: RobotId,
    /// Display color of the goal.
    #[serde(default)]
    pub color: String,
}

/// A complete puzzle as stored in a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    /// Number of columns.
    #[serde(default = "default_side_length")]
    pub width: i64,
    /// Number of rows.
    #[serde(default = "default_side_length")]
    pub height: i64,
    /// The walls on the board.
    #[serde(default)]
    pub walls: Vec<WallRecord>,
    /// One goal per robot.
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    /// The starting positions of the robots as `[x, y]`, the index is the robot id.
    pub robots: Vec<[i64; 2]>,
}

fn default_side_length() -> i64 {
    DEFAULT_SIDE_LENGTH.into()
}

/// Converts a coordinate pair from a map into a position.
///
/// Values that can't be a position on any board are rejected here, positions outside of the actual
/// board are rejected by the board itself.
fn to_position(x: i64, y: i64) -> Result<Position, BoardError> {
    let limit = i64::from(MAX_SIDE_LENGTH);
    if !(0..limit).contains(&x) || !(0..limit).contains(&y) {
        return Err(BoardError::InvalidBoardGeometry(format!(
            "({}, {}) is not a valid position",
            x, y
        )));
    }
    Ok(Position::new(x as PositionEncoding, y as PositionEncoding))
}

fn to_side_length(len: i64) -> Result<PositionEncoding, BoardError> {
    PositionEncoding::try_from(len).map_err(|_| {
        BoardError::InvalidBoardGeometry(format!("{} is not a valid side length", len))
    })
}

impl WallRecord {
    /// Converts the record into a wall.
    pub fn to_wall(&self) -> Result<Wall, BoardError> {
        let direction: Direction = u8::try_from(self.direction)
            .map_err(|_| BoardError::UnknownDirectionCode(self.direction))?
            .try_into()?;
        Ok(Wall::new(to_position(self.x_pos, self.y_pos)?, direction))
    }
}

impl From<&Wall> for WallRecord {
    fn from(wall: &Wall) -> Self {
        Self {
            x_pos: wall.position().column().into(),
            y_pos: wall.position().row().into(),
            direction: wall.direction().code().into(),
        }
    }
}

impl GoalRecord {
    /// Converts the record into a goal.
    pub fn to_goal(&self) -> Result<Goal, BoardError> {
        Ok(Goal::with_color(
            to_position(self.x, self.y)?,
            self.robot_id,
            self.color.clone(),
        ))
    }
}

impl From<&Goal> for GoalRecord {
    fn from(goal: &Goal) -> Self {
        Self {
            x: goal.position().column().into(),
            y: goal.position().row().into(),
            robot_id: goal.robot(),
            color: goal.color().to_string(),
        }
    }
}

impl PuzzleRecord {
    /// Creates the record of a board together with starting positions.
    pub fn new(board: &Board, positions: &RobotPositions) -> Self {
        Self {
            width: board.width().into(),
            height: board.height().into(),
            walls: board.walls().iter().map(WallRecord::from).collect(),
            goals: board.goals().iter().map(GoalRecord::from).collect(),
            robots: positions
                .iter()
                .map(|pos| [pos.column().into(), pos.row().into()])
                .collect(),
        }
    }

    /// Builds the board and starting positions and checks that they fit together.
    pub fn build(&self) -> Result<(Board, RobotPositions), BoardError> {
        let walls = self
            .walls
            .iter()
            .map(WallRecord::to_wall)
            .collect::<Result<Vec<_>, _>>()?;
        let goals = self
            .goals
            .iter()
            .map(GoalRecord::to_goal)
            .collect::<Result<Vec<_>, _>>()?;
        let board = Board::new(
            to_side_length(self.width)?,
            to_side_length(self.height)?,
            walls,
            goals,
        )?;

        let positions = self
            .robots
            .iter()
            .map(|&[x, y]| to_position(x, y))
            .collect::<Result<RobotPositions, _>>()?;
        board.check_positions(&positions)?;

        Ok((board, positions))
    }
}

/// Parses a JSON array of wall records.
pub fn parse_walls(json: &str) -> Result<Vec<Wall>, MapError> {
    let records: Vec<WallRecord> = serde_json::from_str(json)?;
    Ok(records
        .iter()
        .map(WallRecord::to_wall)
        .collect::<Result<Vec<_>, BoardError>>()?)
}

/// Parses a JSON puzzle and returns the checked board and starting positions.
pub fn parse_puzzle(json: &str) -> Result<(Board, RobotPositions), MapError> {
    let record: PuzzleRecord = serde_json::from_str(json)?;
    Ok(record.build()?)
}

/// Serializes a board and starting positions as a JSON puzzle.
pub fn to_json(board: &Board, positions: &RobotPositions) -> Result<String, MapError> {
    let record = PuzzleRecord::new(board, positions);
    Ok(serde_json::to_string_pretty(&record)?)
}
