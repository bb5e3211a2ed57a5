pub mod dump;
pub mod snapshot;

pub use dump::{DumpParseError, DumpSection, SectionKind, split_sections};
pub use snapshot::{SnapshotParseError, parse_snapshot};
