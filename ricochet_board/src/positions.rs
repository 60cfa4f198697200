use itertools::Itertools;
use std::{fmt, mem, ops};

use crate::{Board, Direction, DIRECTIONS};

/// The type a position is encoded as.
///
/// Half of the bits store the column, the other half the row. A u16 is sufficient to encode any
/// position on a board with up to 256 columns and rows, see [Position] for more information.
pub type PositionEncoding = u16;

/// The index of a robot in [`RobotPositions`](RobotPositions).
pub type RobotId = usize;

/// A position on the board.
///
/// ```txt
/// column   row
/// 00000000|00000000
/// ```
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    encoded_position: PositionEncoding,
}

/// Positions of all robots on the board, indexed by [`RobotId`](RobotId).
///
/// Two `RobotPositions` are equal if every robot is on the same field in both.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RobotPositions {
    positions: Vec<Position>,
}

/// A single move of one robot.
///
/// Besides the robot and the direction it was moved in, the field the robot came to rest on is
/// stored. This is only meaningful together with the positions the move was made from.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Move {
    robot: RobotId,
    direction: Direction,
    destination: Position,
}

impl Position {
    /// Number of bits used for the encoding.
    const BIT_COUNT: PositionEncoding = mem::size_of::<PositionEncoding>() as PositionEncoding * 8;

    /// Bitflag used to extract the row information of a position by removing the column bits.
    ///
    /// The first half of the bits is `0` the rest `1`, `0000_0000_1111_1111` for `u16`.
    const ROW_FLAG: PositionEncoding = PositionEncoding::MAX >> (Self::BIT_COUNT / 2);

    /// Creates a new position.
    ///
    /// The caller has to make sure, that both coordinates are smaller than 256.
    pub fn new(column: PositionEncoding, row: PositionEncoding) -> Self {
        debug_assert!(column <= Self::ROW_FLAG && row <= Self::ROW_FLAG);
        Position {
            encoded_position: (column << (Self::BIT_COUNT / 2)) ^ row,
        }
    }

    /// Returns the column (x coordinate) of the position.
    #[inline(always)]
    pub fn column(&self) -> PositionEncoding {
        self.encoded_position >> (Self::BIT_COUNT / 2)
    }

    /// Returns the row (y coordinate) of the position.
    #[inline(always)]
    pub fn row(&self) -> PositionEncoding {
        self.encoded_position & Self::ROW_FLAG
    }

    /// Moves the position one field to `direction`.
    ///
    /// Returns `None` if that field lies outside of a `width` x `height` board.
    pub fn step(
        self,
        direction: Direction,
        width: PositionEncoding,
        height: PositionEncoding,
    ) -> Option<Self> {
        let (column, row) = (self.column(), self.row());
        let (column, row) = match direction {
            Direction::North => (column, row.checked_sub(1)?),
            Direction::South => (column, row + 1),
            Direction::East => (column + 1, row),
            Direction::West => (column.checked_sub(1)?, row),
        };

        if column < width && row < height {
            Some(Position::new(column, row))
        } else {
            None
        }
    }

    /// Returns the number of steps between `self` and `other` when moving only along rows and
    /// columns.
    pub fn manhattan_distance(self, other: Position) -> usize {
        let d_col = (i32::from(self.column()) - i32::from(other.column())).abs();
        let d_row = (i32::from(self.row()) - i32::from(other.row())).abs();
        (d_col + d_row) as usize
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.column(), self.row())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.column(), self.row())
    }
}

impl From<Position> for (PositionEncoding, PositionEncoding) {
    fn from(pos: Position) -> Self {
        (pos.column(), pos.row())
    }
}

impl From<(PositionEncoding, PositionEncoding)> for Position {
    fn from((col, row): (PositionEncoding, PositionEncoding)) -> Self {
        Self::new(col, row)
    }
}

impl Move {
    /// Creates a move of `robot` in `direction` which ends on `destination`.
    pub fn new(robot: RobotId, direction: Direction, destination: Position) -> Self {
        Self {
            robot,
            direction,
            destination,
        }
    }

    /// Returns the moved robot.
    pub fn robot(&self) -> RobotId {
        self.robot
    }

    /// Returns the direction the robot was moved in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the field the robot stopped on.
    pub fn destination(&self) -> Position {
        self.destination
    }
}

impl fmt::Display for Move {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "robot {} -> {}, final position: {}",
            self.robot, self.direction, self.destination
        )
    }
}

impl RobotPositions {
    /// Creates the positions from a slice of position tuples.
    ///
    /// The robot at index `i` of `positions` gets the id `i`.
    pub fn from_tuples(positions: &[(PositionEncoding, PositionEncoding)]) -> Self {
        positions.iter().copied().map(Position::from).collect()
    }

    /// Returns the number of robots.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Checks if there are no robots.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns an iterator over the positions in the order of the robot ids.
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    /// Returns the positions as a slice indexed by robot id.
    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    /// Checks if `pos` has any robot on it.
    #[inline(always)]
    pub fn contains_any_robot(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Checks if a robot other than `robot` is on `pos`.
    #[inline(always)]
    pub fn contains_other_robot(&self, robot: RobotId, pos: Position) -> bool {
        self.positions
            .iter()
            .enumerate()
            .any(|(other, &other_pos)| other != robot && other_pos == pos)
    }

    /// Returns the field `robot` stops on when it is moved in `direction`.
    ///
    /// All other robots act as obstacles.
    pub fn slide(&self, board: &Board, robot: RobotId, direction: Direction) -> Position {
        board.slide(self[robot], direction, |pos| {
            self.contains_other_robot(robot, pos)
        })
    }

    /// Moves `robot` as far in the given `direction` as possible and returns where it stopped.
    pub fn move_robot(&mut self, board: &Board, robot: RobotId, direction: Direction) -> Position {
        let destination = self.slide(board, robot, direction);
        self.positions[robot] = destination;
        destination
    }

    /// Moves `robot` as far in the given `direction` as possible.
    pub fn move_in_direction(mut self, board: &Board, robot: RobotId, direction: Direction) -> Self {
        self.move_robot(board, robot, direction);
        self
    }

    /// Returns the positions after `movement` has been made.
    ///
    /// Only the moved robot changes its position, `self` is left untouched.
    pub fn apply(&self, movement: &Move) -> Self {
        let mut next = self.clone();
        next.positions[movement.robot()] = movement.destination();
        next
    }

    /// Creates an iterator over all moves that change the positions.
    ///
    /// The moves are ordered by robot id first and then by the order of
    /// [`DIRECTIONS`](crate::DIRECTIONS). Moving a robot into a direction in which it is blocked
    /// right away is not a move.
    pub fn reachable_moves<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Move> + 'a {
        (0..self.len())
            .cartesian_product(DIRECTIONS.iter())
            .filter_map(move |(robot, &direction)| {
                let destination = self.slide(board, robot, direction);
                Some(Move::new(robot, direction, destination))
                    .filter(|_| destination != self[robot])
            })
    }

    /// Creates an iterator over all positions reachable in one move that differ from `self`
    /// together with the move leading there.
    pub fn reachable_positions<'a>(
        &'a self,
        board: &'a Board,
    ) -> impl Iterator<Item = (RobotPositions, Move)> + 'a {
        self.reachable_moves(board)
            .map(move |movement| (self.apply(&movement), movement))
    }
}

impl std::iter::FromIterator<Position> for RobotPositions {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        RobotPositions {
            positions: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Position>> for RobotPositions {
    fn from(positions: Vec<Position>) -> Self {
        RobotPositions { positions }
    }
}

impl ops::Index<RobotId> for RobotPositions {
    type Output = Position;

    fn index(&self, index: RobotId) -> &Self::Output {
        &self.positions[index]
    }
}

impl fmt::Debug for RobotPositions {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "[{}]",
            self.positions.iter().map(|pos| format!("{:?}", pos)).join(" | ")
        )
    }
}

impl fmt::Display for RobotPositions {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let lines = self
            .positions
            .iter()
            .enumerate()
            .map(|(robot, pos)| format!("Robot {}: {}", robot, pos))
            .join("\n");
        write!(fmt, "{}", lines)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::{Board, Direction, Goal, Move, PositionEncoding, RobotPositions, Wall};

    #[test]
    fn check_flags() {
        let base: PositionEncoding = 2;
        let row_flag = base.pow((Position::BIT_COUNT / 2) as u32) - 1;
        assert_eq!(row_flag, Position::ROW_FLAG);
        assert_eq!(Position::new(0, 255).column(), 0);
        assert_eq!(Position::new(255, 0).row(), 0);
    }

    #[test]
    fn encoding() {
        let pos = Position::new(255, 7);
        assert_eq!(pos.column(), 255);
        assert_eq!(pos.row(), 7);
        assert_eq!(<(u16, u16)>::from(pos), (255, 7));
    }

    #[test]
    fn step_stays_on_board() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.step(Direction::North, 4, 3), None);
        assert_eq!(pos.step(Direction::West, 4, 3), None);
        assert_eq!(pos.step(Direction::East, 4, 3), Some(Position::new(1, 0)));
        assert_eq!(pos.step(Direction::South, 4, 3), Some(Position::new(0, 1)));

        let corner = Position::new(3, 2);
        assert_eq!(corner.step(Direction::East, 4, 3), None);
        assert_eq!(corner.step(Direction::South, 4, 3), None);
    }

    #[test]
    fn manhattan_distance() {
        let a = Position::new(2, 3);
        assert_eq!(a.manhattan_distance(Position::new(0, 7)), 6);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn slide_to_edge() {
        let board = Board::new_empty(16, 16).unwrap();
        let positions = RobotPositions::from_tuples(&[(2, 3)]);

        assert_eq!(
            positions.slide(&board, 0, Direction::North),
            Position::new(2, 0)
        );
        assert_eq!(
            positions.slide(&board, 0, Direction::South),
            Position::new(2, 15)
        );
        assert_eq!(
            positions.slide(&board, 0, Direction::East),
            Position::new(15, 3)
        );
        assert_eq!(
            positions.slide(&board, 0, Direction::West),
            Position::new(0, 3)
        );
    }

    #[test]
    fn slide_stops_next_to_robot() {
        let board = Board::new_empty(16, 16).unwrap();
        let positions = RobotPositions::from_tuples(&[(2, 3), (9, 3)]);

        let moved = positions.move_in_direction(&board, 0, Direction::East);
        assert_eq!(moved[0], Position::new(8, 3));
        assert_eq!(moved[1], Position::new(9, 3));
    }

    #[test]
    fn slide_stops_at_wall() {
        let board = Board::new(
            8,
            8,
            vec![Wall::new(Position::new(5, 1), Direction::West)],
            vec![],
        )
        .unwrap();
        let positions = RobotPositions::from_tuples(&[(0, 1), (7, 1)]);

        assert_eq!(
            positions.slide(&board, 0, Direction::East),
            Position::new(4, 1)
        );
        assert_eq!(
            positions.slide(&board, 1, Direction::West),
            Position::new(5, 1)
        );
    }

    #[test]
    fn slide_terminates_within_side_length() {
        let board = Board::new_empty(32, 5).unwrap();
        let positions = RobotPositions::from_tuples(&[(0, 0)]);
        let destination = positions.slide(&board, 0, Direction::East);
        assert_eq!(destination, Position::new(31, 0));
        assert!(destination.manhattan_distance(positions[0]) < 32);
    }

    #[test]
    fn apply_does_not_alias() {
        let start = RobotPositions::from_tuples(&[(2, 3), (3, 3)]);
        let next = start.apply(&Move::new(1, Direction::South, Position::new(3, 15)));
        assert_eq!(start, RobotPositions::from_tuples(&[(2, 3), (3, 3)]));
        assert_eq!(next, RobotPositions::from_tuples(&[(2, 3), (3, 15)]));
    }

    #[test]
    fn reachable_moves() {
        let board = Board::new(
            4,
            4,
            vec![],
            vec![
                Goal::new(Position::new(3, 3), 0),
                Goal::new(Position::new(0, 0), 1),
            ],
        )
        .unwrap();
        let starting_pos = RobotPositions::from_tuples(&[(0, 0), (1, 0)]);

        let expected = vec![
            Move::new(0, Direction::South, Position::new(0, 3)),
            Move::new(1, Direction::South, Position::new(1, 3)),
            Move::new(1, Direction::East, Position::new(3, 0)),
        ];

        assert_eq!(
            starting_pos.reachable_moves(&board).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn reachable_positions() {
        let board = Board::new_empty(4, 4).unwrap();
        let starting_pos = RobotPositions::from_tuples(&[(0, 0), (1, 0)]);

        let expected = [
            (
                RobotPositions::from_tuples(&[(0, 3), (1, 0)]),
                Move::new(0, Direction::South, Position::new(0, 3)),
            ),
            (
                RobotPositions::from_tuples(&[(0, 0), (1, 3)]),
                Move::new(1, Direction::South, Position::new(1, 3)),
            ),
            (
                RobotPositions::from_tuples(&[(0, 0), (3, 0)]),
                Move::new(1, Direction::East, Position::new(3, 0)),
            ),
        ];

        assert_eq!(
            &starting_pos.reachable_positions(&board).collect::<Vec<_>>(),
            &expected
        );
    }

    #[test]
    fn no_moves_when_boxed_in() {
        let board = Board::new(
            3,
            3,
            vec![
                Wall::new(Position::new(1, 1), Direction::North),
                Wall::new(Position::new(1, 1), Direction::South),
                Wall::new(Position::new(1, 1), Direction::East),
                Wall::new(Position::new(1, 1), Direction::West),
            ],
            vec![],
        )
        .unwrap();
        let positions = RobotPositions::from_tuples(&[(1, 1)]);
        assert_eq!(positions.reachable_moves(&board).count(), 0);
    }
}
