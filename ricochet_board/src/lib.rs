#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! Basic components to play Ricochet Robots puzzles.
//!
//! The puzzle is played on a rectangular grid containing some walls, a number of robots and one
//! goal per robot. A robot can be moved in all four directions but only stops when it hits a wall,
//! another robot or the edge of the board. This is counted as one move and all robots can be moved
//! in arbitrary order. The puzzle is solved once every robot sits on its own goal at the same time.
//!
//! The main components are the [`Board`](Board) and the [`RobotPositions`](RobotPositions). A
//! `Board` stores the walls and goals and answers whether a step between two fields is blocked.
//! `RobotPositions` is the joint state of all robots and knows how to slide a robot and which moves
//! are possible from it.
//!
//! Boards can be loaded from JSON with the [`map`](map) module or generated randomly with the
//! [`generator`](generator) module.

mod error;
pub mod generator;
pub mod map;
mod positions;

use std::convert::TryFrom;
use std::{fmt, ops};

pub use crate::error::BoardError;
pub use crate::positions::{Move, Position, PositionEncoding, RobotId, RobotPositions};

/// All `Direction`s a robot can move in, in the order moves are generated.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

/// The largest supported width or height of a board.
pub const MAX_SIDE_LENGTH: PositionEncoding = 256;

/// The directions a robot can be moved in.
///
/// North points towards row `0`, west towards column `0`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns the change in `(column, row)` of a single step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Returns the code used for this direction in map files.
    pub fn code(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::South => 2,
            Direction::East => 3,
            Direction::West => 4,
        }
    }

    /// Returns the direction of a single step from `from` to `to`.
    ///
    /// Returns `None` if the two positions are not orthogonally adjacent.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let d_col = i32::from(to.column()) - i32::from(from.column());
        let d_row = i32::from(to.row()) - i32::from(from.row());
        DIRECTIONS
            .iter()
            .copied()
            .find(|dir| dir.delta() == (d_col, d_row))
    }
}

impl TryFrom<u8> for Direction {
    type Error = BoardError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Direction::North),
            2 => Ok(Direction::South),
            3 => Ok(Direction::East),
            4 => Ok(Direction::West),
            other => Err(BoardError::UnknownDirectionCode(other.into())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string = format!("{:?}", &self);
        f.pad(&string)
    }
}

/// A wall segment on one side of a field.
///
/// The wall blocks movement across that side in both directions.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Wall {
    position: Position,
    direction: Direction,
}

impl Wall {
    /// Creates a wall on the `direction` side of the field at `position`.
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Returns the field the wall is attached to.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the side of the field the wall is on.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// The goal field of one robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    position: Position,
    robot: RobotId,
    /// Only used for presentation.
    color: String,
}

impl Goal {
    /// Creates a goal for `robot` without a color.
    pub fn new(position: Position, robot: RobotId) -> Self {
        Self::with_color(position, robot, String::new())
    }

    /// Creates a goal for `robot` which is displayed in `color`.
    pub fn with_color(position: Position, robot: RobotId, color: impl Into<String>) -> Self {
        Self {
            position,
            robot,
            color: color.into(),
        }
    }

    /// Returns the field of the goal.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the robot that has to reach this goal.
    pub fn robot(&self) -> RobotId {
        self.robot
    }

    /// Returns the display color of the goal.
    pub fn color(&self) -> &str {
        &self.color
    }
}

/// A field on the board.
///
/// Contains which sides of the field are blocked by a wall, either one attached to this field or
/// one attached to the neighbour on that side.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Returns `true` if the north side is blocked.
    pub north: bool,
    /// Returns `true` if the south side is blocked.
    pub south: bool,
    /// Returns `true` if the east side is blocked.
    pub east: bool,
    /// Returns `true` if the west side is blocked.
    pub west: bool,
}

impl Field {
    /// Checks if the side in `direction` is blocked.
    #[inline(always)]
    pub fn blocks(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    fn block(&mut self, direction: Direction) {
        *match direction {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
        } = true;
    }
}

/// A ricochet robots board containing walls and goals.
///
/// A board never changes after it has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: PositionEncoding,
    height: PositionEncoding,
    walls: Vec<Wall>,
    goals: Vec<Goal>,
    /// Indexed by `[column][row]`.
    fields: Vec<Vec<Field>>,
}

/// Board impl containing code to create a board.
impl Board {
    /// Creates a new `width` x `height` board with the given walls and goals.
    ///
    /// Fails if the size is zero or larger than [`MAX_SIDE_LENGTH`](MAX_SIDE_LENGTH), if a wall or
    /// goal lies outside of the board or if a robot has more than one goal.
    pub fn new(
        width: PositionEncoding,
        height: PositionEncoding,
        walls: Vec<Wall>,
        goals: Vec<Goal>,
    ) -> Result<Self, BoardError> {
        if !(1..=MAX_SIDE_LENGTH).contains(&width) || !(1..=MAX_SIDE_LENGTH).contains(&height) {
            return Err(BoardError::InvalidBoardGeometry(format!(
                "a {}x{} board is not supported, sides must be between 1 and {}",
                width, height, MAX_SIDE_LENGTH
            )));
        }

        let mut board = Self {
            width,
            height,
            walls: Vec::with_capacity(walls.len()),
            goals: Vec::with_capacity(goals.len()),
            fields: vec![vec![Field::default(); height as usize]; width as usize],
        };

        for wall in walls {
            board.add_wall(wall)?;
        }
        for goal in goals {
            board.add_goal(goal)?;
        }

        Ok(board)
    }

    /// Creates a board without any walls or goals.
    pub fn new_empty(
        width: PositionEncoding,
        height: PositionEncoding,
    ) -> Result<Self, BoardError> {
        Self::new(width, height, Vec::new(), Vec::new())
    }

    /// Adds a wall and marks the blocked side on both fields it separates.
    fn add_wall(&mut self, wall: Wall) -> Result<(), BoardError> {
        let pos = wall.position();
        if !self.contains(pos) {
            return Err(BoardError::InvalidBoardGeometry(format!(
                "wall at {} is outside of the {}x{} board",
                pos, self.width, self.height
            )));
        }

        self[pos].block(wall.direction());
        if let Some(neighbour) = pos.step(wall.direction(), self.width, self.height) {
            self[neighbour].block(wall.direction().opposite());
        }

        self.walls.push(wall);
        Ok(())
    }

    fn add_goal(&mut self, goal: Goal) -> Result<(), BoardError> {
        if !self.contains(goal.position()) {
            return Err(BoardError::InvalidBoardGeometry(format!(
                "goal of robot {} at {} is outside of the {}x{} board",
                goal.robot(),
                goal.position(),
                self.width,
                self.height
            )));
        }
        if self.goal_of(goal.robot()).is_some() {
            return Err(BoardError::DuplicateGoal(goal.robot()));
        }

        self.goals.push(goal);
        Ok(())
    }
}

/// Board impl containing code to interact with a board.
impl Board {
    /// Returns the number of columns.
    pub fn width(&self) -> PositionEncoding {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> PositionEncoding {
        self.height
    }

    /// Returns the walls in the order they were added.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Returns the goals in the order they were added.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Checks if `pos` lies on the board.
    #[inline(always)]
    pub fn contains(&self, pos: Position) -> bool {
        pos.column() < self.width && pos.row() < self.height
    }

    /// Checks if a wall is next to `pos` in the given `direction`.
    #[inline(always)]
    pub fn is_adjacent_to_wall(&self, pos: Position, direction: Direction) -> bool {
        self[pos].blocks(direction)
    }

    /// Checks if a wall blocks the step from `from` to the adjacent field `to`.
    ///
    /// This is the case if `from` has a wall on the side facing `to` or if `to` has a wall on the
    /// side facing `from`. Returns `false` if the fields are not adjacent.
    pub fn is_blocked(&self, from: Position, to: Position) -> bool {
        match Direction::between(from, to) {
            Some(direction) => self.is_adjacent_to_wall(from, direction),
            None => false,
        }
    }

    /// Returns the field next to `pos` in `direction` if it is on the board.
    #[inline(always)]
    pub fn neighbour(&self, pos: Position, direction: Direction) -> Option<Position> {
        pos.step(direction, self.width, self.height)
    }

    /// Returns the field a robot starting at `start` stops on when moved in `direction`.
    ///
    /// The robot advances one field at a time until the next field is off the board, separated by
    /// a wall or `occupied`. If the first step is already impossible, `start` is returned.
    pub fn slide<F>(&self, start: Position, direction: Direction, occupied: F) -> Position
    where
        F: Fn(Position) -> bool,
    {
        let mut current = start;
        while !self.is_adjacent_to_wall(current, direction) {
            match self.neighbour(current, direction) {
                Some(next) if !occupied(next) => current = next,
                _ => break,
            }
        }
        current
    }

    /// Returns the goal position of `robot`.
    pub fn goal_of(&self, robot: RobotId) -> Option<Position> {
        self.goals
            .iter()
            .find(|goal| goal.robot() == robot)
            .map(Goal::position)
    }

    /// Checks if `pos` is the goal of `robot`.
    pub fn is_on_goal(&self, pos: Position, robot: RobotId) -> bool {
        self.goals
            .iter()
            .any(|goal| goal.robot() == robot && goal.position() == pos)
    }

    /// Checks if every robot is on its own goal.
    ///
    /// Goals of robots missing from `positions` are never met.
    pub fn is_goal(&self, positions: &RobotPositions) -> bool {
        positions.len() == self.goals.len()
            && positions
                .iter()
                .enumerate()
                .all(|(robot, &pos)| self.is_on_goal(pos, robot))
    }

    /// Checks that `positions` can be used as the starting positions of a search on this board.
    ///
    /// Every robot has to be on the board on a field of its own and the robots have to match the
    /// goals one to one.
    pub fn check_positions(&self, positions: &RobotPositions) -> Result<(), BoardError> {
        if positions.is_empty() {
            return Err(BoardError::InvalidBoardGeometry(
                "at least one robot is needed".to_string(),
            ));
        }

        for (robot, &pos) in positions.iter().enumerate() {
            if !self.contains(pos) {
                return Err(BoardError::InvalidBoardGeometry(format!(
                    "robot {} at {} is outside of the {}x{} board",
                    robot, pos, self.width, self.height
                )));
            }
            if positions.contains_other_robot(robot, pos) {
                return Err(BoardError::InvalidBoardGeometry(format!(
                    "robot {} shares the field {} with another robot",
                    robot, pos
                )));
            }
        }

        let robots = positions.len();
        if self.goals.len() != robots || self.goals.iter().any(|goal| goal.robot() >= robots) {
            return Err(BoardError::RobotCountMismatch {
                robots,
                goals: self.goals.len(),
            });
        }

        Ok(())
    }
}

impl ops::Index<Position> for Board {
    type Output = Field;

    fn index(&self, index: Position) -> &Self::Output {
        &self.fields[index.column() as usize][index.row() as usize]
    }
}

impl ops::IndexMut<Position> for Board {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.fields[index.column() as usize][index.row() as usize]
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use crate::{Board, BoardError, Direction, Goal, Position, RobotPositions, Wall};

    fn create_board() -> Board {
        Board::new(
            16,
            16,
            vec![
                Wall::new(Position::new(2, 2), Direction::North),
                Wall::new(Position::new(6, 7), Direction::East),
                Wall::new(Position::new(15, 0), Direction::South),
            ],
            vec![
                Goal::with_color(Position::new(0, 7), 0, "red"),
                Goal::with_color(Position::new(9, 9), 1, "blue"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn board_creation() {
        let board = create_board();
        assert_eq!(board.walls().len(), 3);
        assert_eq!(board.goals()[1].color(), "blue");
    }

    #[test]
    fn opposite_directions() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);
    }

    #[test]
    fn direction_codes() {
        for code in 1..=4 {
            assert_eq!(Direction::try_from(code).unwrap().code(), code);
        }
        assert_eq!(
            Direction::try_from(5),
            Err(BoardError::UnknownDirectionCode(5))
        );
    }

    #[test]
    fn direction_between() {
        let pos = Position::new(3, 3);
        assert_eq!(
            Direction::between(pos, Position::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(pos, Position::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(Direction::between(pos, Position::new(5, 3)), None);
        assert_eq!(Direction::between(pos, pos), None);
    }

    #[test]
    fn wall_blocks_both_sides() {
        let board = create_board();

        // The north wall of (2,2) lies between (2,1) and (2,2).
        assert!(board.is_blocked(Position::new(2, 2), Position::new(2, 1)));
        assert!(board.is_blocked(Position::new(2, 1), Position::new(2, 2)));
        assert!(!board.is_blocked(Position::new(2, 3), Position::new(2, 2)));
        assert!(!board.is_blocked(Position::new(1, 2), Position::new(2, 2)));

        assert!(board.is_blocked(Position::new(6, 7), Position::new(7, 7)));
        assert!(board.is_blocked(Position::new(7, 7), Position::new(6, 7)));
    }

    #[test]
    fn north_wall_stops_robots() {
        let board = create_board();
        let positions = RobotPositions::from_tuples(&[(2, 5), (2, 0)]);

        // Moving north the robot enters (2,2) and stops in front of the wall.
        assert_eq!(
            positions.slide(&board, 0, Direction::North),
            Position::new(2, 2)
        );
        // Moving south the other robot stops above the wall.
        assert_eq!(
            positions.slide(&board, 1, Direction::South),
            Position::new(2, 1)
        );

        // Starting right at the wall, the robot can't move at all.
        let positions = RobotPositions::from_tuples(&[(2, 1), (9, 9)]);
        assert_eq!(
            positions.slide(&board, 0, Direction::South),
            Position::new(2, 1)
        );
    }

    #[test]
    fn wall_on_edge() {
        // A wall pointing off the board is allowed and changes nothing.
        let board = Board::new(
            4,
            4,
            vec![Wall::new(Position::new(3, 3), Direction::East)],
            vec![],
        )
        .unwrap();
        assert!(board.is_adjacent_to_wall(Position::new(3, 3), Direction::East));
        assert!(!board.is_adjacent_to_wall(Position::new(3, 3), Direction::West));
    }

    #[test]
    fn goal_test() {
        let board = create_board();
        assert!(board.is_on_goal(Position::new(0, 7), 0));
        assert!(!board.is_on_goal(Position::new(0, 7), 1));

        assert!(board.is_goal(&RobotPositions::from_tuples(&[(0, 7), (9, 9)])));
        // Both robots have to be on their own goal.
        assert!(!board.is_goal(&RobotPositions::from_tuples(&[(0, 7), (9, 8)])));
        assert!(!board.is_goal(&RobotPositions::from_tuples(&[(9, 9), (0, 7)])));
        assert!(!board.is_goal(&RobotPositions::from_tuples(&[(0, 7)])));
    }

    #[test]
    fn invalid_geometry() {
        assert!(matches!(
            Board::new_empty(0, 16),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
        assert!(matches!(
            Board::new_empty(16, 257),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
        assert!(matches!(
            Board::new(
                16,
                16,
                vec![Wall::new(Position::new(16, 10), Direction::West)],
                vec![]
            ),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
        assert!(matches!(
            Board::new(8, 8, vec![], vec![Goal::new(Position::new(3, 8), 0)]),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
    }

    #[test]
    fn duplicate_goal() {
        let result = Board::new(
            8,
            8,
            vec![],
            vec![
                Goal::new(Position::new(1, 1), 0),
                Goal::new(Position::new(2, 2), 0),
            ],
        );
        assert_eq!(result, Err(BoardError::DuplicateGoal(0)));
    }

    #[test]
    fn check_positions() {
        let board = create_board();
        assert_eq!(
            board.check_positions(&RobotPositions::from_tuples(&[(2, 3), (3, 3)])),
            Ok(())
        );
        assert_eq!(
            board.check_positions(&RobotPositions::from_tuples(&[(2, 3)])),
            Err(BoardError::RobotCountMismatch {
                robots: 1,
                goals: 2
            })
        );
        assert!(matches!(
            board.check_positions(&RobotPositions::from_tuples(&[(2, 3), (2, 3)])),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
        assert!(matches!(
            board.check_positions(&RobotPositions::from_tuples(&[(2, 3), (16, 3)])),
            Err(BoardError::InvalidBoardGeometry(_))
        ));
    }
}
