use std::cmp::Ordering;

use tickprof_protocol::SharedStr;

use crate::model::{LocationPath, SampleStore};

/// What a timing row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingKind {
    /// The queried parent itself; always the first row.
    Header,
    /// A recorded child location.
    Location,
    /// Parent time not attributed to any child.
    Unspecified,
}

/// One row of a timing breakdown relative to a parent location.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilerTiming {
    pub name: SharedStr,
    pub kind: TimingKind,
    /// Share of the immediate parent's time, 0-100.
    pub parent_section_usage_percentage: f64,
    /// Share of the whole run's time, 0-100.
    pub total_usage_percentage: f64,
    pub visit_count: u64,
}

impl ProfilerTiming {
    /// Row name of the bucket holding a parent's time that no child claimed.
    pub const UNSPECIFIED: &'static str = "unspecified";

    /// Natural sort order: heaviest share of the parent first.
    pub fn cmp_usage(&self, other: &Self) -> Ordering {
        other
            .parent_section_usage_percentage
            .total_cmp(&self.parent_section_usage_percentage)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Break `parent`'s time down into its direct children.
///
/// The first row is always the parent itself at 100%. The remaining rows are
/// sorted by [`ProfilerTiming::cmp_usage`]; the sort is stable so ties keep
/// path order. Time in the parent that no child accounts for is reported as
/// a [`ProfilerTiming::UNSPECIFIED`] row. Header rows are named by joining
/// the parent path with `separator`.
///
/// Normalization is best effort. Samples taken concurrently can make the
/// children sum to more than their parent; the larger of the two then becomes
/// the denominator (and the run total is raised to at least that), so no row
/// exceeds 100%. Percentages in such subtrees no longer reproduce the true
/// proportions exactly.
pub fn timings_for(
    store: &SampleStore,
    parent: &LocationPath,
    separator: char,
) -> Vec<ProfilerTiming> {
    let parent_info = store.get(parent);
    let parent_visits = parent_info.visit_count;

    let children: Vec<_> = store.direct_children(parent).collect();
    let raw_child_sum = children
        .iter()
        .fold(0_u64, |sum, (_, info)| sum.saturating_add(info.total_time));

    let denom = raw_child_sum.max(parent_info.total_time);
    let root_total = store.get(&LocationPath::root()).total_time.max(denom);

    let mut rows = Vec::with_capacity(children.len() + 2);
    for (path, info) in children {
        let Some(name) = path.last_segment() else {
            continue;
        };
        rows.push(ProfilerTiming {
            name: name.clone(),
            kind: TimingKind::Location,
            parent_section_usage_percentage: percentage(info.total_time, denom),
            total_usage_percentage: percentage(info.total_time, root_total),
            visit_count: info.visit_count,
        });
    }

    if denom > raw_child_sum {
        let unspecified = denom - raw_child_sum;
        rows.push(ProfilerTiming {
            name: SharedStr::from(ProfilerTiming::UNSPECIFIED),
            kind: TimingKind::Unspecified,
            parent_section_usage_percentage: percentage(unspecified, denom),
            total_usage_percentage: percentage(unspecified, root_total),
            visit_count: parent_visits,
        });
    }

    rows.sort_by(ProfilerTiming::cmp_usage);
    rows.insert(
        0,
        ProfilerTiming {
            name: SharedStr::from(parent.join(separator)),
            kind: TimingKind::Header,
            parent_section_usage_percentage: 100.0,
            total_usage_percentage: percentage(denom, root_total),
            visit_count: parent_visits,
        },
    );
    rows
}
