use thiserror::Error;
use tickprof_protocol::{ProfileSnapshot, RunWindow};

use super::path::LocationPath;
use super::store::SampleStore;
use crate::views::timings::{ProfilerTiming, timings_for};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("end time {end} is before start time {start}")]
    NonMonotonicTime { start: u64, end: u64 },
    #[error("end tick {end} is before start tick {start}")]
    NonMonotonicTicks { start: u64, end: u64 },
}

/// A finished measurement window: the frozen sample store plus run metadata.
///
/// Read-only after construction. Any number of reports can be rendered from
/// the same result concurrently.
#[derive(Debug, Clone)]
pub struct ProfileResult {
    store: SampleStore,
    window: RunWindow,
}

impl ProfileResult {
    pub fn new(store: SampleStore, window: RunWindow) -> Result<Self, ProfileError> {
        if window.end_time < window.start_time {
            return Err(ProfileError::NonMonotonicTime {
                start: window.start_time,
                end: window.end_time,
            });
        }
        if window.end_tick < window.start_tick {
            return Err(ProfileError::NonMonotonicTicks {
                start: window.start_tick,
                end: window.end_tick,
            });
        }
        Ok(Self { store, window })
    }

    pub fn from_snapshot(snapshot: ProfileSnapshot, separator: char) -> Result<Self, ProfileError> {
        let store = SampleStore::from_records(snapshot.locations, separator);
        Self::new(store, snapshot.window)
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn window(&self) -> RunWindow {
        self.window
    }

    pub fn start_time(&self) -> u64 {
        self.window.start_time
    }

    pub fn end_time(&self) -> u64 {
        self.window.end_time
    }

    pub fn start_tick(&self) -> u64 {
        self.window.start_tick
    }

    pub fn end_tick(&self) -> u64 {
        self.window.end_tick
    }

    /// Elapsed wall time in nanoseconds.
    pub fn time_span(&self) -> u64 {
        self.window.time_span()
    }

    /// Elapsed ticks. May be zero; per-tick averages must check.
    pub fn tick_span(&self) -> u64 {
        self.window.tick_span()
    }

    /// Child timings under `parent`, header row first.
    pub fn timings(&self, parent: &LocationPath, separator: char) -> Vec<ProfilerTiming> {
        timings_for(&self.store, parent, separator)
    }
}
