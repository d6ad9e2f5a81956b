pub use builder::{build_database, BuildError};
pub use database::{PatternDatabase, PdbError};
pub use partition::{Partition, PartitionError};

mod builder;
mod database;
mod partition;
mod ranking;
