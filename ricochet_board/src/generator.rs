//! Tools to generate random puzzles of different sizes.

use itertools::Itertools;
use rand::prelude::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{
    Board, BoardError, Goal, Position, PositionEncoding, RobotPositions, Wall, DIRECTIONS,
    MAX_SIDE_LENGTH,
};

/// The number of robots placed by default.
pub const DEFAULT_ROBOTS: usize = 3;

/// Display colors given to the goals, repeated if there are more robots.
pub const GOAL_COLORS: [&str; 4] = ["red", "blue", "green", "yellow"];

/// A puzzle generator to create boards, goals and starting positions.
///
/// Generators created with the same seed and settings produce the same sequence of puzzles.
#[derive(Debug)]
pub struct Generator {
    rng: rand_pcg::Pcg64Mcg,
    width: PositionEncoding,
    height: PositionEncoding,
    robots: usize,
    walls: usize,
}

impl Generator {
    /// Creates a new generator with a random state.
    pub fn new(width: PositionEncoding, height: PositionEncoding) -> Self {
        Self::with_rng(rand_pcg::Pcg64Mcg::from_entropy(), width, height)
    }

    /// Creates a new generator initialized with `seed`.
    pub fn from_seed(seed: u128, width: PositionEncoding, height: PositionEncoding) -> Self {
        Self::with_rng(rand_pcg::Pcg64Mcg::new(seed.wrapping_mul(2)), width, height)
    }

    fn with_rng(
        rng: rand_pcg::Pcg64Mcg,
        width: PositionEncoding,
        height: PositionEncoding,
    ) -> Self {
        Self {
            rng,
            width,
            height,
            robots: DEFAULT_ROBOTS,
            // Roughly the wall density of the classic 16x16 map.
            walls: width as usize * height as usize / 10,
        }
    }

    /// Sets the number of robots and goals.
    pub fn robots(mut self, robots: usize) -> Self {
        self.robots = robots;
        self
    }

    /// Sets the number of wall segments.
    pub fn walls(mut self, walls: usize) -> Self {
        self.walls = walls;
        self
    }

    /// Generates a new board with walls and one goal per robot.
    ///
    /// Fails if the board size is invalid or the board has fewer fields than robots.
    pub fn generate_board(&mut self) -> Result<Board, BoardError> {
        if self.width > MAX_SIDE_LENGTH || self.height > MAX_SIDE_LENGTH {
            return Err(BoardError::InvalidBoardGeometry(format!(
                "a {}x{} board is not supported",
                self.width, self.height
            )));
        }
        let fields = self.fields();
        if fields.is_empty() || fields.len() < self.robots {
            return Err(BoardError::InvalidBoardGeometry(format!(
                "{} robots don't fit on a {}x{} board",
                self.robots, self.width, self.height
            )));
        }

        let mut walls = Vec::with_capacity(self.walls);
        for _ in 0..self.walls {
            let pos = fields[self.rng.gen_range(0..fields.len())];
            let dir = DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())];
            walls.push(Wall::new(pos, dir));
        }

        let goals = fields
            .choose_multiple(&mut self.rng, self.robots)
            .enumerate()
            .map(|(robot, &pos)| {
                Goal::with_color(pos, robot, GOAL_COLORS[robot % GOAL_COLORS.len()])
            })
            .collect();

        Board::new(self.width, self.height, walls, goals)
    }

    /// Generates a new board and starting positions on distinct fields.
    pub fn generate_puzzle(&mut self) -> Result<(Board, RobotPositions), BoardError> {
        let board = self.generate_board()?;
        let positions = self
            .fields()
            .choose_multiple(&mut self.rng, self.robots)
            .copied()
            .collect::<RobotPositions>();
        board.check_positions(&positions)?;
        Ok((board, positions))
    }

    /// Returns all fields of the board.
    fn fields(&self) -> Vec<Position> {
        (0..self.width)
            .cartesian_product(0..self.height)
            .map(Position::from)
            .collect()
    }
}
