use std::collections::BTreeMap;

use tickprof_protocol::SharedStr;

use crate::model::SampleStore;

/// Per-path totals for a single counter.
///
/// The tree is rooted at a synthetic node above every recorded path, so the
/// top node's `total_value` is the counter's sum over the whole capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterNode {
    /// Value recorded exactly at this path.
    pub self_value: u64,
    /// Value recorded at this path or any descendant.
    pub total_value: u64,
    pub children: BTreeMap<SharedStr, CounterNode>,
}

impl CounterNode {
    /// Attribute `value` to the path made of `segments`, below this node.
    pub fn add<'a, I>(&mut self, segments: I, value: u64)
    where
        I: IntoIterator<Item = &'a SharedStr>,
    {
        let mut node = self;
        node.total_value = node.total_value.saturating_add(value);
        for segment in segments {
            node = node.children.entry(segment.clone()).or_default();
            node.total_value = node.total_value.saturating_add(value);
        }
        node.self_value = node.self_value.saturating_add(value);
    }

    pub fn child(&self, segment: &str) -> Option<&CounterNode> {
        self.children.get(segment)
    }

    /// Children heaviest first; equal totals stay in name order.
    pub fn children_by_total(&self) -> Vec<(&SharedStr, &CounterNode)> {
        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by(|(_, a), (_, b)| b.total_value.cmp(&a.total_value));
        children
    }
}

/// Build one counter tree per counter name, keyed (and ordered) by name.
///
/// Locations without counters contribute nothing.
pub fn build_counter_trees(store: &SampleStore) -> BTreeMap<SharedStr, CounterNode> {
    let mut trees: BTreeMap<SharedStr, CounterNode> = BTreeMap::new();
    for (path, info) in store.iter() {
        for (name, &value) in &info.counters {
            trees
                .entry(name.clone())
                .or_default()
                .add(path.segments(), value);
        }
    }
    trees
}
