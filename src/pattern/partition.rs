use std::error::Error;
use std::fmt::{Display, Formatter};

/// Disjoint tile groups jointly covering every tile of a board.
///
/// Group labels are stored sorted, and the group order is preserved; both
/// are part of the on-disk table identity, so they must not change between
/// a build and a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    side: u8,
    groups: Vec<Vec<u8>>,
}

impl Partition {
    pub fn new(side: u8, groups: Vec<Vec<u8>>) -> Result<Self, PartitionError> {
        if !(2..=15).contains(&side) {
            return Err(PartitionError::UnsupportedSide(side));
        }
        let cell_count = side * side;

        let mut groups: Vec<Vec<u8>> = groups;
        let mut seen = vec![false; usize::from(cell_count)];
        for group in &mut groups {
            if group.is_empty() {
                return Err(PartitionError::EmptyGroup);
            }
            // one non-group cell besides the empty one must remain, or half
            // of the group placements become unreachable
            if group.len() > usize::from(cell_count) - 2 {
                return Err(PartitionError::GroupTooLarge(group.len()));
            }
            group.sort_unstable();
            for &label in group.iter() {
                if label == 0 || label >= cell_count {
                    return Err(PartitionError::LabelOutOfRange(label));
                }
                if seen[usize::from(label)] {
                    return Err(PartitionError::DuplicateLabel(label));
                }
                seen[usize::from(label)] = true;
            }
        }

        if let Some(missing) = (1..cell_count).find(|&label| !seen[usize::from(label)]) {
            return Err(PartitionError::MissingLabel(missing));
        }

        Ok(Self { side, groups })
    }

    /// The 6-6-3 partition of the 15-puzzle
    pub fn standard_663() -> Self {
        Self {
            side: 4,
            groups: vec![
                (1..=6).collect(),
                (7..=12).collect(),
                (13..=15).collect(),
            ],
        }
    }

    /// The 5-5-5 partition of the 15-puzzle
    pub fn standard_555() -> Self {
        Self {
            side: 4,
            groups: vec![
                (1..=5).collect(),
                (6..=10).collect(),
                (11..=15).collect(),
            ],
        }
    }

    /// The 7-8 partition of the 15-puzzle. Strongest of the canonical
    /// schemes, but the 8-tile table alone holds ~519 million entries.
    pub fn standard_78() -> Self {
        Self {
            side: 4,
            groups: vec![(1..=7).collect(), (8..=15).collect()],
        }
    }

    /// Splits the tiles into consecutive runs of at most `group_size`
    /// labels. A reasonable default for sides without a canonical scheme.
    pub fn chunked(side: u8, group_size: u8) -> Result<Self, PartitionError> {
        if group_size == 0 {
            return Err(PartitionError::EmptyGroup);
        }
        let cell_count = u16::from(side) * u16::from(side);
        let labels: Vec<u8> = (1..cell_count as u8).collect();
        let groups = labels
            .chunks(usize::from(group_size))
            .map(<[u8]>::to_vec)
            .collect();
        Self::new(side, groups)
    }

    pub fn side(&self) -> u8 {
        self.side
    }

    pub fn groups(&self) -> &[Vec<u8>] {
        &self.groups
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sizes: Vec<String> = self.groups.iter().map(|g| g.len().to_string()).collect();
        write!(f, "{}", sizes.join("-"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    UnsupportedSide(u8),
    EmptyGroup,
    GroupTooLarge(usize),
    LabelOutOfRange(u8),
    DuplicateLabel(u8),
    MissingLabel(u8),
}

impl Display for PartitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::UnsupportedSide(side) => {
                write!(f, "Board side {side} is not supported")
            }
            PartitionError::EmptyGroup => write!(f, "Partition contains an empty group"),
            PartitionError::GroupTooLarge(size) => {
                write!(f, "A group of {size} tiles leaves no free cell on the board")
            }
            PartitionError::LabelOutOfRange(label) => {
                write!(f, "Tile {label} does not exist on the board")
            }
            PartitionError::DuplicateLabel(label) => {
                write!(f, "Tile {label} appears in more than one group")
            }
            PartitionError::MissingLabel(label) => {
                write!(f, "Tile {label} is not covered by any group")
            }
        }
    }
}

impl Error for PartitionError {}
