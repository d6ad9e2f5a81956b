use std::collections::{HashSet, VecDeque};

use crate::board::{Board, BoardMove, OwnedBoard};
use crate::solving::algorithm::{util, Solver, SolvingError};
use crate::solving::is_solvable;
use crate::solving::movegen::MoveGenerator;

/// Exhaustive breadth-first search.
///
/// Finds shortest solutions without any heuristic, at the cost of keeping
/// the whole frontier in memory. Practical only for small boards; serves as
/// the optimality reference for the informed solvers.
pub struct BFSSolver {
    expanded: HashSet<OwnedBoard>,
    move_generator: MoveGenerator,
    queue: VecDeque<(OwnedBoard, Vec<BoardMove>)>,
}

impl BFSSolver {
    #[must_use]
    pub fn new(board: OwnedBoard, move_generator: MoveGenerator) -> Self {
        let mut queue = VecDeque::new();
        if is_solvable(&board) {
            queue.push_back((board, vec![]));
        }
        Self {
            expanded: HashSet::new(),
            move_generator,
            queue,
        }
    }

    fn bfs_iteration(
        &mut self,
        current_board: &OwnedBoard,
        current_path: &[BoardMove],
    ) -> Option<Vec<BoardMove>> {
        if current_board.is_solved() {
            return Some(current_path.to_vec());
        }

        if !self.expanded.insert(current_board.clone()) {
            // already expanded through a path at most as long
            return None;
        }

        for next_move in self
            .move_generator
            .generate_moves(current_board, current_path.last().copied())
        {
            let mut new_board = current_board.clone();
            let mut new_path = current_path.to_vec();
            util::apply_move(&mut new_board, &mut new_path, next_move);
            self.queue.push_back((new_board, new_path));
        }

        None
    }
}

impl Solver for BFSSolver {
    fn solve(mut self: Box<Self>) -> Result<Vec<BoardMove>, SolvingError> {
        while let Some((board, path)) = self.queue.pop_front() {
            if let Some(result) = self.bfs_iteration(&board, &path) {
                return Ok(result);
            }
        }
        Err(SolvingError::UnsolvableBoard)
    }
}
