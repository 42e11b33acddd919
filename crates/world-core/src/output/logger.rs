//! Event Logger
//!
//! Population journal. Every spawn and despawn becomes one JSON line, and
//! the logger keeps per-species tallies so a run can be summarised without
//! re-reading the file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use world_events::{Species, WorldEvent};

/// Spawn and despawn totals per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    spawned: [u64; Species::COUNT],
    despawned: [u64; Species::COUNT],
}

impl Tally {
    pub fn spawned(&self, species: Species) -> u64 {
        self.spawned[species.index()]
    }

    pub fn despawned(&self, species: Species) -> u64 {
        self.despawned[species.index()]
    }

    /// Net population change over the logged events.
    pub fn net(&self, species: Species) -> i64 {
        self.spawned(species) as i64 - self.despawned(species) as i64
    }

    fn record(&mut self, event: &WorldEvent) {
        let slot = event.species.index();
        if event.is_spawn() {
            self.spawned[slot] += 1;
        } else if event.is_despawn() {
            self.despawned[slot] += 1;
        }
    }
}

/// JSONL sink for world events. Without a file it only tallies.
pub struct EventLogger {
    sink: Option<BufWriter<File>>,
    tally: Tally,
    written: u64,
}

impl EventLogger {
    /// Truncates or creates `path`.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            sink: Some(BufWriter::new(file)),
            tally: Tally::default(),
            written: 0,
        })
    }

    pub fn null() -> Self {
        Self {
            sink: None,
            tally: Tally::default(),
            written: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.written
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn log(&mut self, event: &WorldEvent) -> io::Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            serde_json::to_writer(&mut *sink, event)?;
            sink.write_all(b"\n")?;
        }
        self.tally.record(event);
        self.written += 1;
        Ok(())
    }

    /// Logs events in order, stopping at the first write failure.
    pub fn log_batch(&mut self, events: &[WorldEvent]) -> io::Result<()> {
        events.iter().try_for_each(|event| self.log(event))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, events = self.written, "event log not flushed");
        }
    }
}
