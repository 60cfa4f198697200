use log::{debug, trace};
use ricochet_board::{Board, BoardError, RobotPositions};
use std::time::{Duration, Instant};

use crate::util::VisitedNodes;
use crate::Path;

/// Bounds for a single search.
///
/// The state space grows with `fields^robots`, so an unbounded search on a large board with no
/// solution can run for a very long time. Both limits are unset by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// The maximum number of positions to expand.
    pub max_expansions: Option<usize>,
    /// The maximum time to spend searching.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    /// Limits without any bounds.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Sets the maximum number of expanded positions.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    /// Sets the maximum search time.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    fn exceeded(&self, expanded: usize, elapsed: Duration) -> bool {
        self.max_expansions.map_or(false, |max| expanded >= max)
            || self.time_limit.map_or(false, |limit| elapsed >= limit)
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions taken from the frontier and expanded.
    pub expanded: usize,
    /// Previously unseen positions added to the frontier.
    pub generated: usize,
    /// Wall clock time of the search.
    pub elapsed: Duration,
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every robot has been moved to its goal.
    Solved(Path),
    /// Every reachable position has been visited without finding a solution.
    Exhausted,
    /// The search was stopped by its [`SearchLimits`](SearchLimits).
    LimitReached,
}

/// The result of a search together with its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    /// How the search ended.
    pub outcome: Outcome,
    /// Counters collected during the search.
    pub stats: SearchStats,
}

impl Search {
    /// Returns the found path, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    /// Converts the search into the found path, if any.
    pub fn into_path(self) -> Option<Path> {
        match self.outcome {
            Outcome::Solved(path) => Some(path),
            _ => None,
        }
    }
}

/// The container of positions that have been found but not yet expanded.
///
/// The order in which positions are taken out defines the search algorithm.
pub(crate) trait Frontier {
    /// Adds `positions` which have been reached with `moves` moves.
    fn push(&mut self, positions: RobotPositions, moves: usize);

    /// Removes the next position to expand together with the moves needed to reach it.
    fn pop(&mut self) -> Option<(RobotPositions, usize)>;
}

/// Explores the positions reachable from `start_positions` in the order given by `frontier` until
/// all robots are on their goals.
///
/// A position is marked as visited when it's added to the frontier and is never added again. The
/// goal test happens when a position is taken from the frontier.
///
/// Fails without searching if `start_positions` don't fit the board, see
/// [`Board::check_positions`](ricochet_board::Board::check_positions).
pub(crate) fn explore<F: Frontier>(
    name: &str,
    board: &Board,
    start_positions: RobotPositions,
    frontier: &mut F,
    limits: &SearchLimits,
) -> Result<Search, BoardError> {
    board.check_positions(&start_positions)?;
    debug!("{}: searching from {:?}", name, start_positions);

    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut visited_nodes = VisitedNodes::with_capacity(65536);

    visited_nodes.add_root(start_positions.clone());
    frontier.push(start_positions, 0);

    let outcome = loop {
        let (positions, moves) = match frontier.pop() {
            Some(next) => next,
            None => break Outcome::Exhausted,
        };

        if board.is_goal(&positions) {
            break Outcome::Solved(visited_nodes.path_to(&positions));
        }

        if limits.exceeded(stats.expanded, started.elapsed()) {
            trace!("{}: stopped by {:?}", name, limits);
            break Outcome::LimitReached;
        }
        stats.expanded += 1;

        for (next_positions, movement) in positions.reachable_positions(board) {
            if visited_nodes
                .add_node(next_positions.clone(), &positions, moves + 1, movement)
                .was_discarded()
            {
                continue;
            }

            stats.generated += 1;
            frontier.push(next_positions, moves + 1);
        }
    };

    stats.elapsed = started.elapsed();
    match &outcome {
        Outcome::Solved(path) => debug!(
            "{}: solution with {} moves found in {:.2?} with {} positions tried",
            name,
            path.len(),
            stats.elapsed,
            stats.generated
        ),
        _ => debug!(
            "{}: search concluded in {:.2?} after {} expansions without a solution, {} positions visited",
            name,
            stats.elapsed,
            stats.expanded,
            visited_nodes.len()
        ),
    }

    Ok(Search { outcome, stats })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SearchLimits;

    #[test]
    fn unlimited() {
        let limits = SearchLimits::unlimited();
        assert!(!limits.exceeded(usize::MAX, Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn expansion_limit() {
        let limits = SearchLimits::unlimited().with_max_expansions(10);
        assert!(!limits.exceeded(9, Duration::from_secs(100)));
        assert!(limits.exceeded(10, Duration::from_secs(0)));
    }

    #[test]
    fn time_limit() {
        let limits = SearchLimits::unlimited().with_time_limit(Duration::from_millis(5));
        assert!(!limits.exceeded(1000, Duration::from_millis(4)));
        assert!(limits.exceeded(0, Duration::from_millis(5)));
    }
}
