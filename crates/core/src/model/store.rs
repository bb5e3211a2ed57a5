use std::collections::BTreeMap;
use std::ops::Bound;

use tickprof_protocol::LocationRecord;

use super::location::LocationInfo;
use super::path::LocationPath;

/// Immutable path-keyed sample storage.
///
/// Built once from a frozen capture; there is no way to mutate it afterwards,
/// so a store can be shared across threads while reports are rendered.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    locations: BTreeMap<LocationPath, LocationInfo>,
}

impl SampleStore {
    /// Build a store from raw separator-joined paths, as found in a snapshot.
    pub fn from_records<I>(records: I, separator: char) -> Self
    where
        I: IntoIterator<Item = (String, LocationRecord)>,
    {
        records
            .into_iter()
            .map(|(raw, record)| (LocationPath::parse(&raw, separator), record.into()))
            .collect()
    }

    /// Look up a location. Missing paths resolve to the shared empty record.
    pub fn get(&self, path: &LocationPath) -> &LocationInfo {
        self.locations
            .get(path)
            .unwrap_or(LocationInfo::empty_ref())
    }

    /// Locations exactly one segment below `parent`, in path order.
    pub fn direct_children<'a>(
        &'a self,
        parent: &'a LocationPath,
    ) -> impl Iterator<Item = (&'a LocationPath, &'a LocationInfo)> + 'a {
        self.locations
            .range::<LocationPath, _>((Bound::Excluded(parent), Bound::Unbounded))
            .take_while(move |(path, _)| path.starts_with(parent))
            .filter(move |(path, _)| path.is_direct_child_of(parent))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocationPath, &LocationInfo)> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Whether any location recorded at least one counter.
    pub fn has_counters(&self) -> bool {
        self.locations.values().any(|info| !info.counters.is_empty())
    }
}

impl FromIterator<(LocationPath, LocationInfo)> for SampleStore {
    fn from_iter<T: IntoIterator<Item = (LocationPath, LocationInfo)>>(iter: T) -> Self {
        Self {
            locations: iter.into_iter().collect(),
        }
    }
}
