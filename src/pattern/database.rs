use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::board::Board;
use crate::pattern::partition::Partition;
use crate::pattern::ranking::{rank, table_len};
use crate::solving::algorithm::heuristics::Heuristic;

/// File identification tag, followed by a format version byte.
const MAGIC: [u8; 4] = *b"APDB";
const VERSION: u8 = 1;

/// Sentinel for entries not yet written by the builder. Never present in a
/// completed table; a loaded file containing it is corrupt.
pub(crate) const UNFILLED: u8 = u8::MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GroupTable {
    tiles: Vec<u8>,
    entries: Box<[u8]>,
}

impl GroupTable {
    pub(crate) fn new(tiles: Vec<u8>, entries: Box<[u8]>) -> Self {
        Self { tiles, entries }
    }

    pub(crate) fn entries(&self) -> &[u8] {
        &self.entries
    }
}

/// Additive pattern database: one dense cost table per tile group.
///
/// Built once by [`build_database`](crate::pattern::build_database) or
/// loaded from disk, then immutable; lookups need no synchronisation.
///
/// On disk the database is a single file:
///
/// | field | size |
/// |------------------------|---------------------|
/// | magic `APDB` | 4 bytes |
/// | format version | 1 byte |
/// | board side | 1 byte |
/// | group count `k` | 1 byte |
/// | entry width (bytes) | 1 byte |
/// | `k` × (size, labels…) | 1 + size bytes |
/// | `k` table bodies | entries × width |
///
/// Bodies follow in group order, each indexed by placement rank. Costs fit
/// one byte on every supported board, so the entry width is always 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternDatabase {
    side: u8,
    groups: Vec<GroupTable>,
}

impl PatternDatabase {
    pub(crate) fn from_parts(side: u8, groups: Vec<GroupTable>) -> Self {
        Self { side, groups }
    }

    pub fn side(&self) -> u8 {
        self.side
    }

    /// The partition the database was built from
    pub fn partition(&self) -> Partition {
        Partition::new(self.side, self.groups.iter().map(|g| g.tiles.clone()).collect())
            .expect("a constructed database always holds a valid partition")
    }

    /// Confirms the database fits boards of the given side
    pub fn check_side(&self, board: &dyn Board) -> Result<(), PdbError> {
        if board.side() == self.side {
            Ok(())
        } else {
            Err(PdbError::IncompatibleSide {
                database: self.side,
                board: board.side(),
            })
        }
    }

    pub fn load(path: &Path) -> Result<Self, PdbError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PdbError::Missing(path.to_path_buf())
            } else {
                PdbError::Io(e)
            }
        })?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        read_bytes(&mut reader, &mut magic)?;
        if magic != MAGIC {
            return Err(PdbError::Corrupt("not a pattern database file".into()));
        }
        let version = read_byte(&mut reader)?;
        if version != VERSION {
            return Err(PdbError::Corrupt(format!(
                "unsupported format version {version}"
            )));
        }

        let side = read_byte(&mut reader)?;
        let group_count = read_byte(&mut reader)?;
        let entry_width = read_byte(&mut reader)?;
        if entry_width != 1 {
            return Err(PdbError::Corrupt(format!(
                "unsupported entry width {entry_width}"
            )));
        }

        let mut tile_groups = Vec::with_capacity(usize::from(group_count));
        for _ in 0..group_count {
            let group_len = read_byte(&mut reader)?;
            let mut tiles = vec![0u8; usize::from(group_len)];
            read_bytes(&mut reader, &mut tiles)?;
            tile_groups.push(tiles);
        }

        // a malformed partition also invalidates every table that follows
        let partition = Partition::new(side, tile_groups)
            .map_err(|e| PdbError::Corrupt(format!("invalid partition: {e}")))?;

        let cell_count = usize::from(side) * usize::from(side);
        let mut groups = Vec::with_capacity(partition.groups().len());
        for tiles in partition.groups() {
            let entries_len: usize = table_len(cell_count, tiles.len())
                .try_into()
                .map_err(|_| PdbError::Corrupt("table does not fit in memory".into()))?;
            let mut entries = vec![0u8; entries_len];
            read_bytes(&mut reader, &mut entries)?;
            if entries.contains(&UNFILLED) {
                return Err(PdbError::Corrupt("table contains an unfilled entry".into()));
            }
            groups.push(GroupTable::new(tiles.clone(), entries.into_boxed_slice()));
        }

        if reader.read(&mut [0u8; 1]).map_err(PdbError::Io)? != 0 {
            return Err(PdbError::Corrupt("trailing data after the tables".into()));
        }

        Ok(Self { side, groups })
    }

    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        let mut writer = BufWriter::new(File::create(path)?);

        writer.write_all(&MAGIC)?;
        writer.write_all(&[VERSION, self.side, self.groups.len() as u8, 1])?;
        for group in &self.groups {
            writer.write_all(&[group.tiles.len() as u8])?;
            writer.write_all(&group.tiles)?;
        }
        for group in &self.groups {
            writer.write_all(&group.entries)?;
        }

        writer.flush()
    }
}

/// Sums the per-group costs of the board's current tile placements.
///
/// Each move is charged to at most one group, so the sum stays a lower
/// bound on the remaining moves. Values are recomputed per call; no state
/// is carried between lookups.
impl Heuristic for PatternDatabase {
    fn evaluate(&self, board: &dyn Board) -> u64 {
        let side = board.side();
        debug_assert_eq!(self.side, side, "database does not match the board");
        let cell_count = usize::from(side) * usize::from(side);

        let mut position_of = vec![0u8; cell_count];
        for row in 0..side {
            for column in 0..side {
                let value = board.at(row, column);
                position_of[usize::from(value)] = row * side + column;
            }
        }

        self.groups
            .iter()
            .map(|group| {
                let cells: Vec<u8> = group
                    .tiles
                    .iter()
                    .map(|&tile| position_of[usize::from(tile)])
                    .collect();
                u64::from(group.entries[rank(&cells, cell_count) as usize])
            })
            .sum()
    }
}

#[derive(Debug)]
pub enum PdbError {
    /// No database exists at the given path
    Missing(PathBuf),
    Io(io::Error),
    Corrupt(String),
    IncompatibleSide { database: u8, board: u8 },
}

impl Display for PdbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PdbError::Missing(path) => {
                write!(f, "No pattern database found at {}", path.display())
            }
            PdbError::Io(err) => write!(f, "Error while reading pattern database: {err}"),
            PdbError::Corrupt(reason) => {
                write!(f, "The pattern database is corrupt: {reason}")
            }
            PdbError::IncompatibleSide { database, board } => write!(
                f,
                "The pattern database was built for side {database}, but the board has side {board}"
            ),
        }
    }
}

impl Error for PdbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PdbError::Io(err) => Some(err),
            _ => None,
        }
    }
}

fn read_byte(reader: &mut impl Read) -> Result<u8, PdbError> {
    let mut byte = [0u8; 1];
    read_bytes(reader, &mut byte)?;
    Ok(byte[0])
}

fn read_bytes(reader: &mut impl Read, buffer: &mut [u8]) -> Result<(), PdbError> {
    reader.read_exact(buffer).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            PdbError::Corrupt("unexpected end of file".into())
        } else {
            PdbError::Io(e)
        }
    })
}
