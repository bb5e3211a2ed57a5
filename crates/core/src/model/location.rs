use std::collections::BTreeMap;

use tickprof_protocol::{LocationRecord, SharedStr};

static EMPTY_INFO: LocationInfo = LocationInfo::EMPTY;

/// Timing and counter totals recorded at one profiler location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    /// Cumulative time spent in the location, in the host clock's unit.
    pub total_time: u64,
    pub visit_count: u64,
    /// Counters incremented exactly at this location (not descendants).
    pub counters: BTreeMap<SharedStr, u64>,
}

impl LocationInfo {
    /// Zero time, zero visits, no counters.
    pub const EMPTY: LocationInfo = LocationInfo {
        total_time: 0,
        visit_count: 0,
        counters: BTreeMap::new(),
    };

    /// Shared instance returned for locations missing from a store.
    pub fn empty_ref() -> &'static LocationInfo {
        &EMPTY_INFO
    }

    pub fn new(total_time: u64, visit_count: u64) -> Self {
        Self {
            total_time,
            visit_count,
            counters: BTreeMap::new(),
        }
    }

    pub fn with_counter(mut self, name: impl Into<SharedStr>, value: u64) -> Self {
        self.counters.insert(name.into(), value);
        self
    }
}

impl From<LocationRecord> for LocationInfo {
    fn from(record: LocationRecord) -> Self {
        Self {
            total_time: record.total_time,
            visit_count: record.visit_count,
            counters: record.counters,
        }
    }
}
