use std::cmp::{max, min};

use crate::board::{Board, BoardMove};

pub trait Heuristic {
    /// Calculates the heuristic for a given board setting.
    /// The heuristic is the lower bound on the required number of moves
    fn evaluate(&self, board: &dyn Board) -> u64;

    /// Value of `board` given that it was produced by applying `last_move`
    /// to a parent whose value was `parent_value`.
    ///
    /// The default implementation recomputes from scratch; implementations
    /// with a cheap delta may override it. Must agree with
    /// [`evaluate`](Heuristic::evaluate) on every reachable board.
    fn update(&self, board: &dyn Board, last_move: BoardMove, parent_value: u64) -> u64 {
        let _ = (last_move, parent_value);
        self.evaluate(board)
    }
}

#[derive(Default)]
pub struct ManhattanDistance;

fn manhattan_distance((r1, c1): (u8, u8), (r2, c2): (u8, u8)) -> u64 {
    let row_distance = max(r1, r2) - min(r1, r2);
    let column_distance = max(c1, c2) - min(c1, c2);
    u64::from(row_distance) + u64::from(column_distance)
}

fn nonzero_cell_expected_pos(cell: u8, side: u8) -> (u8, u8) {
    ((cell - 1) / side, (cell - 1) % side)
}

impl Heuristic for ManhattanDistance {
    fn evaluate(&self, board: &dyn Board) -> u64 {
        let side = board.side();

        let mut total_distance = 0;

        for row in 0..side {
            for column in 0..side {
                let value = board.at(row, column);
                if value == 0 {
                    continue;
                }
                let target = nonzero_cell_expected_pos(value, side);
                total_distance += manhattan_distance((row, column), target);
            }
        }

        total_distance
    }

    /// Only the tile swapped with the empty cell changed its contribution,
    /// so the sum is patched in constant time.
    fn update(&self, board: &dyn Board, last_move: BoardMove, parent_value: u64) -> u64 {
        let (empty_row, empty_col) = board.empty_cell_pos();
        // the moved tile now occupies the cell the empty cell came from,
        // one step against the move direction
        let (tile_row, tile_col) = match last_move {
            BoardMove::Up => (empty_row + 1, empty_col),
            BoardMove::Down => (empty_row - 1, empty_col),
            BoardMove::Left => (empty_row, empty_col + 1),
            BoardMove::Right => (empty_row, empty_col - 1),
        };

        let tile = board.at(tile_row, tile_col);
        debug_assert_ne!(tile, 0);
        let target = nonzero_cell_expected_pos(tile, board.side());

        let old_distance = manhattan_distance((empty_row, empty_col), target);
        let new_distance = manhattan_distance((tile_row, tile_col), target);

        parent_value + new_distance - old_distance
    }
}
