//! Output
//!
//! JSON snapshots and the JSONL event log.

pub mod logger;
pub mod snapshot;

pub use logger::{EventLogger, Tally};
pub use snapshot::{take_snapshot, write_snapshot, SnapshotDetail};
