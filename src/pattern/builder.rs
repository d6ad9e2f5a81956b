use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};

use bit_set::BitSet;
use rayon::prelude::*;

use crate::pattern::database::{GroupTable, PatternDatabase, UNFILLED};
use crate::pattern::partition::Partition;
use crate::pattern::ranking::{rank, table_len, unrank};

/// Builds the cost tables for every group of `partition`.
///
/// Groups are independent and are dispatched to a worker pool;
/// `workers == 0` uses one worker per logical CPU.
pub fn build_database(
    partition: &Partition,
    workers: usize,
) -> Result<PatternDatabase, BuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| BuildError::WorkerPool(e.to_string()))?;

    let side = partition.side();
    log::info!(
        "building {partition} pattern database for side {side} on {} workers",
        pool.current_num_threads()
    );

    let tables = pool.install(|| {
        partition
            .groups()
            .par_iter()
            .map(|tiles| build_group(side, tiles))
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(PatternDatabase::from_parts(side, tables))
}

/// 0-1 breadth-first search over augmented states `(placement, empty cell)`,
/// encoded as `rank * cell_count + empty_cell`.
///
/// Starting from the group's goal placement, sliding a non-group tile only
/// relocates the empty cell and costs nothing; sliding a group tile changes
/// the placement and costs one move. Zero-cost successors go to the front of
/// the deque and unit-cost successors to the back, so states leave the deque
/// in cost order and the first visit of an augmented state is final. Several
/// augmented states share a placement; the first (smallest) cost reached for
/// a placement is the value stored in the table.
fn build_group(side: u8, tiles: &[u8]) -> Result<GroupTable, BuildError> {
    let cell_count = usize::from(side) * usize::from(side);
    let placements = table_len(cell_count, tiles.len());
    let entries_len: usize = placements
        .try_into()
        .map_err(|_| BuildError::TableTooLarge(tiles.len()))?;
    let augmented_len = entries_len
        .checked_mul(cell_count)
        .ok_or(BuildError::TableTooLarge(tiles.len()))?;

    let mut entries = vec![UNFILLED; entries_len];
    let mut visited = BitSet::with_capacity(augmented_len);
    let mut queue: VecDeque<(u64, u8)> = VecDeque::new();

    let goal_cells: Vec<u8> = tiles.iter().map(|&t| t - 1).collect();
    let goal_empty = (cell_count - 1) as u64;
    queue.push_back((rank(&goal_cells, cell_count) * cell_count as u64 + goal_empty, 0));

    while let Some((augmented, cost)) = queue.pop_front() {
        if visited.contains(augmented as usize) {
            continue;
        }
        visited.insert(augmented as usize);

        let placement = augmented / cell_count as u64;
        let entry = &mut entries[placement as usize];
        if *entry == UNFILLED {
            // cost order guarantees this is the minimum over empty-cell positions
            *entry = cost;
        }

        let cells = unrank(placement, tiles.len(), cell_count);
        let empty_cell = (augmented % cell_count as u64) as u8;
        let empty_row = i16::from(empty_cell) / i16::from(side);
        let empty_col = i16::from(empty_cell) % i16::from(side);

        for (row_delta, col_delta) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let row = empty_row + row_delta;
            let col = empty_col + col_delta;
            if row < 0 || col < 0 || row >= i16::from(side) || col >= i16::from(side) {
                continue;
            }
            let neighbour = (row * i16::from(side) + col) as u8;

            let successor = match cells.iter().position(|&c| c == neighbour) {
                Some(slot) => {
                    // a group tile slides into the empty cell
                    let mut moved = cells.clone();
                    moved[slot] = empty_cell;
                    let next =
                        rank(&moved, cell_count) * cell_count as u64 + u64::from(neighbour);
                    (next, cost + 1)
                }
                // any other tile slides; the placement is unchanged
                None => (placement * cell_count as u64 + u64::from(neighbour), cost),
            };

            if visited.contains(successor.0 as usize) {
                continue;
            }
            if successor.1 == cost {
                queue.push_front(successor);
            } else {
                queue.push_back(successor);
            }
        }
    }

    if entries.contains(&UNFILLED) {
        return Err(BuildError::UnreachablePlacement);
    }

    log::debug!(
        "group {tiles:?}: {entries_len} entries, max cost {}",
        entries.iter().max().copied().unwrap_or(0)
    );

    Ok(GroupTable::new(tiles.to_vec(), entries.into_boxed_slice()))
}

#[derive(Debug)]
pub enum BuildError {
    /// The cost table for a group of this many tiles does not fit in memory
    TableTooLarge(usize),
    WorkerPool(String),
    /// A placement was never reached; the enumeration is inconsistent
    UnreachablePlacement,
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::TableTooLarge(size) => {
                write!(f, "Cost table for a {size}-tile group is too large")
            }
            BuildError::WorkerPool(reason) => {
                write!(f, "Could not start the build worker pool: {reason}")
            }
            BuildError::UnreachablePlacement => {
                write!(f, "A tile placement was never reached during the build")
            }
        }
    }
}

impl Error for BuildError {}
