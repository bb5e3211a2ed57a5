use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::types::RunWindow;

/// Reserved character joining location path segments (ASCII record separator).
pub const PATH_SEPARATOR: char = '\u{1e}';

/// Raw per-location samples as handed over by the host profiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Cumulative time spent inside the location.
    #[serde(default)]
    pub total_time: u64,
    /// Number of times the location was entered.
    #[serde(default)]
    pub visit_count: u64,
    /// Named counters incremented while inside the location.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counters: BTreeMap<SharedStr, u64>,
}

/// A frozen profiler capture: the run window plus every sampled location,
/// keyed by its separator-joined path.
///
/// ```text
///   host profiler ──▶ ProfileSnapshot ──▶ SampleStore ──▶ timings / counters ──▶ report
///                        (this)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub window: RunWindow,
    #[serde(default)]
    pub locations: BTreeMap<String, LocationRecord>,
}

impl ProfileSnapshot {
    pub fn new(window: RunWindow) -> Self {
        Self {
            window,
            locations: BTreeMap::new(),
        }
    }

    /// Builder-style insert used by hosts and tests.
    pub fn with_location(mut self, path: impl Into<String>, record: LocationRecord) -> Self {
        self.locations.insert(path.into(), record);
        self
    }
}
