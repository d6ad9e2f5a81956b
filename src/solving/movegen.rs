use std::fmt::{Display, Formatter};

use rand::seq::SliceRandom;

use crate::board::{Board, BoardMove};

/// Order in which child moves are explored.
///
/// Any fixed order keeps the search deterministic; `Random` shuffles the
/// order at every expansion and is only useful for experiments.
#[derive(Clone, Debug)]
pub enum SearchOrder {
    Provided([BoardMove; 4]),
    Random,
}

impl Default for SearchOrder {
    fn default() -> Self {
        SearchOrder::Provided([
            BoardMove::Up,
            BoardMove::Down,
            BoardMove::Left,
            BoardMove::Right,
        ])
    }
}

impl Display for SearchOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchOrder::Provided(moves) => {
                for m in moves {
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            SearchOrder::Random => write!(f, "random"),
        }
    }
}

#[derive(Clone, Default)]
pub struct MoveGenerator {
    order: SearchOrder,
}

impl MoveGenerator {
    #[must_use]
    pub fn new(order: SearchOrder) -> Self {
        Self { order }
    }

    /// Yields the moves legal on `board`, skipping the one that would
    /// rewind `previous_move`.
    pub fn generate_moves(
        &self,
        board: &dyn Board,
        previous_move: Option<BoardMove>,
    ) -> Vec<BoardMove> {
        let order = match &self.order {
            SearchOrder::Provided(moves) => *moves,
            SearchOrder::Random => {
                let mut moves = [
                    BoardMove::Up,
                    BoardMove::Down,
                    BoardMove::Left,
                    BoardMove::Right,
                ];
                moves.shuffle(&mut rand::thread_rng());
                moves
            }
        };

        order
            .into_iter()
            .filter(|&m| board.can_move(m) && previous_move != Some(m.opposite()))
            .collect()
    }
}
