use crate::models::GeoPoint;
use std::collections::{BTreeMap, HashMap};

/// Points sharing one visit count, keyed by that count in ascending order.
pub type CountGroups = BTreeMap<u32, Vec<GeoPoint>>;

/// Saturating visit counts per grid cell.
///
/// Every stored count is in `1..=max_val`; counts only ever move up.
#[derive(Debug, Clone, Default)]
pub struct HeatmapData {
    counts: HashMap<GeoPoint, u32>,
}

impl HeatmapData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more visit of `point`, saturating at `max_val`.
    /// Returns the stored count.
    pub fn increment(&mut self, point: GeoPoint, max_val: u32) -> u32 {
        let count = self.counts.entry(point).or_insert(0);
        *count = count.saturating_add(1).min(max_val);
        *count
    }

    pub fn get(&self, point: &GeoPoint) -> Option<u32> {
        self.counts.get(point).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn weighted_count(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeoPoint, &u32)> {
        self.counts.iter()
    }

    /// Regroup by count. Points within a group are sorted so the output
    /// does not depend on hash iteration order.
    pub fn group_by_count(&self) -> CountGroups {
        let mut groups = CountGroups::new();
        for (point, &count) in &self.counts {
            groups.entry(count).or_default().push(*point);
        }
        for points in groups.values_mut() {
            points.sort_unstable();
        }
        groups
    }
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub files_read: usize,
    pub trackpoints_read: u64,
    pub weighted_count: u64,
    pub distinct_locations: usize,
}

impl RunStatistics {
    pub fn new(files_read: usize, trackpoints_read: u64, heatmap: &HeatmapData) -> Self {
        Self {
            files_read,
            trackpoints_read,
            weighted_count: heatmap.weighted_count(),
            distinct_locations: heatmap.len(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "loaded {} trackpoints: compressed down to {} points at {} different locations",
            self.trackpoints_read, self.weighted_count, self.distinct_locations
        )
    }
}
