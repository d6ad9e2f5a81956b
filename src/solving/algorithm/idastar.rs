use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, BoardMove, OwnedBoard};
use crate::solving::algorithm::heuristics::Heuristic;
use crate::solving::algorithm::{util, Solver, SolvingError};
use crate::solving::is_solvable;
use crate::solving::movegen::MoveGenerator;

/// Iterative-deepening A*.
///
/// Runs depth-first searches with an increasing bound on `f = g + h`.
/// With an admissible heuristic the first solution found is a shortest one.
/// Cycle avoidance is the inverse-move filter of [`MoveGenerator`]; no
/// visited set is kept, so auxiliary memory stays proportional to the
/// solution length.
pub struct IdaStarSolver {
    board: OwnedBoard,
    heuristic: Box<dyn Heuristic>,
    path: Vec<BoardMove>,
    move_generator: MoveGenerator,
    cancelled: Option<Arc<AtomicBool>>,
}

enum SearchOutcome {
    Found,
    /// Smallest f-cost that exceeded the current bound
    Exceeded(u64),
    Exhausted,
    Cancelled,
}

impl IdaStarSolver {
    #[must_use]
    pub fn new(
        board: OwnedBoard,
        heuristic: Box<dyn Heuristic>,
        move_generator: MoveGenerator,
    ) -> Self {
        Self {
            board,
            heuristic,
            path: vec![],
            move_generator,
            cancelled: None,
        }
    }

    /// Attach a cooperative cancellation token. The token is polled at node
    /// expansion, and a raised token makes [`solve`](Solver::solve) return
    /// [`SolvingError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }

    fn search(&mut self, depth: u64, heuristic_value: u64, bound: u64) -> SearchOutcome {
        let f_cost = depth + heuristic_value;
        if f_cost > bound {
            return SearchOutcome::Exceeded(f_cost);
        }
        if self.board.is_solved() {
            return SearchOutcome::Found;
        }
        if self.is_cancelled() {
            return SearchOutcome::Cancelled;
        }

        let mut minimum = None;
        for next_move in self
            .move_generator
            .generate_moves(&self.board, self.path.last().copied())
        {
            util::apply_move(&mut self.board, &mut self.path, next_move);
            let child_value = self
                .heuristic
                .update(&self.board, next_move, heuristic_value);
            let result = self.call_recursive(depth + 1, child_value, bound);
            match (minimum, result) {
                (_, found @ SearchOutcome::Found) => return found,
                (_, cancelled @ SearchOutcome::Cancelled) => return cancelled,
                (None, SearchOutcome::Exceeded(x)) => {
                    minimum = Some(x);
                }
                (Some(y), SearchOutcome::Exceeded(x)) if x < y => {
                    minimum = Some(x);
                }
                (_, _) => {}
            }
            util::undo_move(&mut self.board, &mut self.path);
        }
        minimum.map_or(SearchOutcome::Exhausted, SearchOutcome::Exceeded)
    }

    fn call_recursive(&mut self, depth: u64, heuristic_value: u64, bound: u64) -> SearchOutcome {
        const STACK_RED_ZONE: usize = 64 * 1024;
        const STACK_GROWTH: usize = 4 * 1024 * 1024;
        // deep iterations must not backtrack on stack exhaustion, so the
        // stack is grown instead
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.search(depth, heuristic_value, bound)
        })
    }
}

impl Solver for IdaStarSolver {
    fn solve(mut self: Box<Self>) -> Result<Vec<BoardMove>, SolvingError> {
        if !is_solvable(&self.board) {
            return Err(SolvingError::UnsolvableBoard);
        }

        let initial_value = self.heuristic.evaluate(&self.board);
        let mut bound = initial_value;
        loop {
            match self.search(0, initial_value, bound) {
                SearchOutcome::Found => break Ok(self.path),
                SearchOutcome::Cancelled => break Err(SolvingError::Cancelled),
                SearchOutcome::Exhausted => break Err(SolvingError::UnsolvableBoard),
                SearchOutcome::Exceeded(next_bound) => {
                    log::trace!("Increasing f-cost bound to {next_bound}");
                    bound = next_bound;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_with_manhattan(board: OwnedBoard) -> Result<Vec<BoardMove>, SolvingError> {
        let solver = Box::new(IdaStarSolver::new(
            board,
            Box::new(crate::solving::algorithm::heuristics::ManhattanDistance),
            MoveGenerator::default(),
        ));
        solver.solve()
    }

    #[test]
    fn solved_board_yields_empty_solution() {
        let solution = solve_with_manhattan(OwnedBoard::solved(4)).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn single_move_board_yields_one_move() {
        let board: OwnedBoard = "1 2 3 4 5 6 7 8 9 10 11 12 13 14 0 15"
            .parse()
            .unwrap();
        let solution = solve_with_manhattan(board).unwrap();
        assert_eq!(vec![BoardMove::Right], solution);
    }

    #[test]
    fn unsolvable_board_is_rejected() {
        let board: OwnedBoard = "2 1 3 4 5 6 7 8 9 10 11 12 13 14 15 0"
            .parse()
            .unwrap();
        let result = solve_with_manhattan(board);
        assert!(matches!(result, Err(SolvingError::UnsolvableBoard)));
    }

    #[test]
    fn raised_token_cancels_the_search() {
        let board: OwnedBoard = "5 1 2 4 9 6 3 8 0 10 7 11 13 14 15 12"
            .parse()
            .unwrap();
        let token = Arc::new(AtomicBool::new(true));
        let solver = Box::new(
            IdaStarSolver::new(
                board,
                Box::new(crate::solving::algorithm::heuristics::ManhattanDistance),
                MoveGenerator::default(),
            )
            .with_cancellation(Arc::clone(&token)),
        );
        assert!(matches!(solver.solve(), Err(SolvingError::Cancelled)));
    }
}
