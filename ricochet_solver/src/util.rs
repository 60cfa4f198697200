use fxhash::FxHashMap;
use ricochet_board::{Board, Move, Position, RobotPositions, DIRECTIONS};
use std::collections::hash_map::Entry;
use std::ops;

use crate::Path;

/// The possible outcomes when trying to add a node to [`VisitedNodes`](VisitedNodes).
pub(crate) enum AddNodeOutcome {
    /// The added node was previously unknown and has been added.
    New,
    /// The node has been seen before. The new node has been discarded.
    Known,
}

impl AddNodeOutcome {
    /// Returns `true` if the node has been added to `VisitedNodes`.
    pub fn was_added(&self) -> bool {
        match self {
            AddNodeOutcome::New => true,
            AddNodeOutcome::Known => false,
        }
    }

    /// Returns `true` if the node has been discarded.
    pub fn was_discarded(&self) -> bool {
        !self.was_added()
    }
}

/// Stores `RobotPositions` and information regarding the positions like nodes in a tree.
///
/// This just wraps a map from `RobotPositions` to a `VisitedNode` and provides convenience methods
/// like [`add_node`](VisitedNodes::add_node) or [`path_to`](VisitedNodes::path_to).
#[derive(Debug, Clone)]
pub(crate) struct VisitedNodes {
    nodes: FxHashMap<RobotPositions, VisitedNode>,
}

impl VisitedNodes {
    /// Creates a new `VisitedNodes` with the given `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of visited positions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the visit information of a node if it has been visited before.
    pub fn get(&self, positions: &RobotPositions) -> Option<&VisitedNode> {
        self.nodes.get(positions)
    }

    /// Adds the starting positions of a search.
    pub fn add_root(&mut self, positions: RobotPositions) {
        self.nodes.insert(positions, VisitedNode::root());
    }

    /// Adds a node at `positions` which has been reached from `from` with `movement`.
    ///
    /// If `positions` has been visited before, the known node is kept.
    pub fn add_node(
        &mut self,
        positions: RobotPositions,
        from: &RobotPositions,
        moves: usize,
        movement: Move,
    ) -> AddNodeOutcome {
        match self.nodes.entry(positions) {
            Entry::Occupied(_) => AddNodeOutcome::Known,
            Entry::Vacant(vacant) => {
                vacant.insert(VisitedNode::new(moves, from.clone(), movement));
                AddNodeOutcome::New
            }
        }
    }

    /// Returns the path through which `positions` has been reached.
    ///
    /// # Panics
    /// Panics if `positions` or one of its predecessors has yet to be visited.
    pub fn path_to(&self, positions: &RobotPositions) -> Path {
        let mut path = Vec::with_capacity(32);
        let mut current_pos = positions.clone();

        // Create the path by following the nodes previous positions.
        loop {
            let current_node = self
                .get(&current_pos)
                .expect("Failed to find a supposed source position");
            match current_node.previous() {
                Some((previous_pos, movement)) => {
                    path.push(*movement);
                    current_pos = previous_pos.clone();
                }
                // current_pos is now the start of the path
                None => break,
            }
        }
        debug_assert_eq!(path.len(), self.get(positions).map_or(0, |n| n.moves_to_reach()));

        path.reverse();
        Path::new(current_pos, positions.clone(), path)
    }
}

/// The information stored for each visited position.
#[derive(Debug, Clone)]
pub(crate) struct VisitedNode {
    /// The number of moves needed to reach this node.
    moves_to_reach: usize,
    /// From where this node was reached and with which move. `None` for the starting positions.
    previous: Option<(RobotPositions, Move)>,
}

impl VisitedNode {
    fn root() -> Self {
        Self {
            moves_to_reach: 0,
            previous: None,
        }
    }

    fn new(moves: usize, previous_position: RobotPositions, movement: Move) -> Self {
        Self {
            moves_to_reach: moves,
            previous: Some((previous_position, movement)),
        }
    }

    /// Returns the number of moves needed to reach this node.
    pub fn moves_to_reach(&self) -> usize {
        self.moves_to_reach
    }

    /// Returns the positions this node was reached from and the move that was made.
    pub fn previous(&self) -> Option<&(RobotPositions, Move)> {
        self.previous.as_ref()
    }
}

/// This board contains the minimum number of moves to reach the target for each field.
///
/// This minimum is a lower bound and may be impossible to reach even if all other robots are
/// positioned perfectly. If the lower bound of a position is the number of fields on the board, then
/// the target is impossible to reach from that field.
///
/// `LeastMovesBoard` implements `Index<Position>` which makes getting the calculated minimum of a
/// positon easy.
#[derive(Debug, Clone, Default)]
pub struct LeastMovesBoard {
    board: Vec<Vec<usize>>,
    target_position: Position,
}

impl LeastMovesBoard {
    /// Creates a new board and calculates the minimum number of moves needed to reach the target
    /// from each field.
    ///
    /// The board is created by starting from the target position and going through all fields from
    /// which the target can be reached in one move, assuming a robot could stop on any field of its
    /// way. These fields are assigned a lower bound of 1 and are added to the list of next positons
    /// to be expanded. This repeats until only the positions from which the target can never be
    /// reached are left. Those positions keep a lower bound of `width * height`, a bound longer
    /// than possible.
    pub fn new(board: &Board, target_position: Position) -> Self {
        let (width, height) = (board.width() as usize, board.height() as usize);
        let unreachable = width * height;
        let mut move_board = vec![vec![unreachable; height]; width];

        let mut current_moves = Vec::with_capacity(256);
        let mut next_moves = current_moves.clone();

        move_board[target_position.column() as usize][target_position.row() as usize] = 0;
        current_moves.push(target_position);

        for move_n in 1usize.. {
            for &pos in &current_moves {
                for &dir in DIRECTIONS.iter() {
                    // Start from pos for each direction.
                    let mut check_pos = pos;
                    while !board.is_adjacent_to_wall(check_pos, dir) {
                        check_pos = match board.neighbour(check_pos, dir) {
                            Some(next) => next,
                            None => break,
                        };
                        let current_min =
                            &mut move_board[check_pos.column() as usize][check_pos.row() as usize];
                        if move_n < *current_min {
                            // new position found
                            *current_min = move_n;
                            next_moves.push(check_pos);
                        }
                    }
                }
            }

            if next_moves.is_empty() {
                break;
            }
            current_moves.clear();
            std::mem::swap(&mut current_moves, &mut next_moves);
        }

        Self {
            board: move_board,
            target_position,
        }
    }

    /// Returns the position all bounds are calculated for.
    pub fn target_position(&self) -> Position {
        self.target_position
    }

    /// Checks whether the target is impossible to reach from `pos`.
    pub fn is_unreachable(&self, pos: Position) -> bool {
        self[pos] >= self.board.len() * self.board.first().map_or(0, Vec::len)
    }
}

impl ops::Index<Position> for LeastMovesBoard {
    type Output = usize;

    fn index(&self, index: Position) -> &Self::Output {
        &self.board[index.column() as usize][index.row() as usize]
    }
}

/// Estimates the number of moves left until every robot is on its goal.
#[derive(Debug, Clone)]
pub(crate) enum Estimator {
    /// Sum of the manhattan distances of each robot to the closest goal of any robot.
    NearestGoal(Vec<Position>),
    /// Sum of the manhattan distances of each robot to its own goal.
    OwnGoal(Vec<Option<Position>>),
    /// Sum of the least moves of each robot to its own goal.
    LeastMoves(Vec<Option<LeastMovesBoard>>),
}

impl Estimator {
    /// Returns the estimated number of moves left starting from `positions`.
    pub fn estimate(&self, positions: &RobotPositions) -> usize {
        match self {
            Estimator::NearestGoal(goals) => positions
                .iter()
                .map(|&pos| {
                    goals
                        .iter()
                        .map(|&goal| pos.manhattan_distance(goal))
                        .min()
                        .unwrap_or(0)
                })
                .sum(),
            Estimator::OwnGoal(goals) => positions
                .iter()
                .zip(goals)
                .filter_map(|(&pos, goal)| goal.map(|goal| pos.manhattan_distance(goal)))
                .sum(),
            Estimator::LeastMoves(boards) => positions
                .iter()
                .zip(boards)
                .filter_map(|(&pos, board)| board.as_ref().map(|board| board[pos]))
                .sum(),
        }
    }
}

/// Returns the goal of each robot in the order of the robot ids.
pub(crate) fn own_goals(board: &Board, robots: usize) -> Vec<Option<Position>> {
    (0..robots).map(|robot| board.goal_of(robot)).collect()
}

#[cfg(test)]
mod tests {
    use ricochet_board::{Board, Direction, Goal, Move, Position, RobotPositions, Wall};

    use super::{own_goals, Estimator, LeastMovesBoard, VisitedNodes};

    #[test]
    fn empty_move_board() {
        let board = Board::new_empty(2, 2).unwrap();
        let target = Position::new(0, 0);
        assert_eq!(
            LeastMovesBoard::new(&board, target).board,
            vec![vec![0, 1], vec![1, 2]]
        );
    }

    #[test]
    fn walled_move_board() {
        // A wall between (0,0) and (0,1) and one between (1,1) and (2,1).
        let board = Board::new(
            3,
            3,
            vec![
                Wall::new(Position::new(0, 0), Direction::South),
                Wall::new(Position::new(1, 1), Direction::East),
            ],
            vec![],
        )
        .unwrap();
        let target = Position::new(0, 0);

        assert_eq!(
            LeastMovesBoard::new(&board, target).board,
            vec![vec![0, 3, 3], vec![1, 2, 2], vec![1, 2, 2]]
        );
    }

    #[test]
    fn unreachable_target() {
        let board = Board::new(
            2,
            2,
            vec![
                Wall::new(Position::new(1, 0), Direction::West),
                Wall::new(Position::new(1, 0), Direction::South),
            ],
            vec![],
        )
        .unwrap();
        let move_board = LeastMovesBoard::new(&board, Position::new(1, 0));
        assert_eq!(move_board[Position::new(0, 0)], 4);
        assert!(move_board.is_unreachable(Position::new(1, 1)));
        assert!(!move_board.is_unreachable(Position::new(1, 0)));
    }

    #[test]
    fn path_reconstruction() {
        let start = RobotPositions::from_tuples(&[(0, 0)]);
        let middle = RobotPositions::from_tuples(&[(0, 3)]);
        let end = RobotPositions::from_tuples(&[(3, 3)]);
        let first = Move::new(0, Direction::South, Position::new(0, 3));
        let second = Move::new(0, Direction::East, Position::new(3, 3));

        let mut nodes = VisitedNodes::with_capacity(4);
        nodes.add_root(start.clone());
        assert!(nodes.add_node(middle.clone(), &start, 1, first).was_added());
        assert!(nodes.add_node(end.clone(), &middle, 2, second).was_added());
        // Known positions are never replaced.
        assert!(nodes.add_node(end.clone(), &start, 1, second).was_discarded());
        assert_eq!(nodes.len(), 3);

        let path = nodes.path_to(&end);
        assert_eq!(path.start_pos(), &start);
        assert_eq!(path.end_pos(), &end);
        assert_eq!(path.movements(), &vec![first, second]);
        assert!(nodes.path_to(&start).is_empty());
    }

    #[test]
    fn estimators() {
        let board = Board::new(
            16,
            16,
            vec![],
            vec![Goal::new(Position::new(0, 7), 0), Goal::new(Position::new(15, 15), 1)],
        )
        .unwrap();
        let positions = RobotPositions::from_tuples(&[(14, 14), (2, 3)]);

        let nearest = Estimator::NearestGoal(board.goals().iter().map(Goal::position).collect());
        assert_eq!(nearest.estimate(&positions), 2 + 6);

        let own = Estimator::OwnGoal(own_goals(&board, 2));
        assert_eq!(own.estimate(&positions), 21 + 25);

        let least = Estimator::LeastMoves(
            own_goals(&board, 2)
                .into_iter()
                .map(|goal| goal.map(|goal| LeastMovesBoard::new(&board, goal)))
                .collect(),
        );
        assert_eq!(least.estimate(&positions), 2 + 2);
    }
}
