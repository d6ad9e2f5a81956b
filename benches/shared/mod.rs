use itertools::Itertools;
use optimal_solver::board::{BoardMove, OwnedBoard};
use optimal_solver::solving::movegen::SearchOrder;

/// Cycles forever through a fixed set of solvable 3x3 boards
pub fn create_sample_boards() -> impl Iterator<Item = OwnedBoard> {
    let board_strings = [
        // Board with 0 moves needed
        "1 2 3 4 5 6 7 8 0",
        // Board with 1 move needed
        "1 2 3 4 5 6 7 0 8",
        // Board with 2 moves needed
        "1 2 3 4 0 5 7 8 6",
        // Board with 5 moves needed
        "4 1 3 0 2 5 7 8 6",
        // Board with 7 moves needed
        "4 1 3 7 2 5 8 0 6",
        // Harder scrambled board
        "2 4 0 1 6 3 7 5 8",
    ];

    let boards: Vec<OwnedBoard> = board_strings
        .into_iter()
        .map(|s| s.parse().unwrap())
        .collect();

    InfiniteIterator {
        inner: boards,
        current_index: 0,
    }
}

struct InfiniteIterator<T> {
    inner: Vec<T>,
    current_index: usize,
}

impl<T> Iterator for InfiniteIterator<T>
where
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner[self.current_index].clone();
        self.current_index += 1;
        if self.current_index >= self.inner.len() {
            self.current_index = 0;
        }
        Some(value)
    }
}

pub fn generate_all_search_orders() -> Vec<SearchOrder> {
    [
        BoardMove::Up,
        BoardMove::Down,
        BoardMove::Left,
        BoardMove::Right,
    ]
    .into_iter()
    .permutations(4)
    .map(|p| SearchOrder::Provided([p[0], p[1], p[2], p[3]]))
    .collect()
}
