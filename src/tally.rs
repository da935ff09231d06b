//! The shared table of value counts.

use dashmap::DashMap;
use itertools::Itertools;
use std::collections::HashMap;

/// Separator between sub-values of a multi-valued field.
pub const DELIMITER: &str = ", ";

/// Occurrence counts by attribute value.
///
/// The table is sharded, so it can be shared by reference between worker
/// threads; each increment locks only the shard that holds the key.
#[derive(Debug, Default)]
pub struct TallyTable {
    counts: DashMap<String, u64>,
}

impl TallyTable {
    pub fn new() -> TallyTable {
        TallyTable {
            counts: DashMap::new(),
        }
    }

    pub fn increment(&self, value: &str) {
        *self.counts.entry(value.to_owned()).or_insert(0) += 1;
    }

    /// Counts every sub-value of `text` once.
    ///
    /// Empty text is counted as the empty string.
    pub fn record(&self, text: &str) {
        for value in text.split(DELIMITER) {
            self.increment(value);
        }
    }

    pub fn count(&self, value: &str) -> u64 {
        self.counts.get(value).map_or(0, |c| *c)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// A snapshot of all entries, sorted by value.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .sorted()
            .collect_vec()
    }

    pub fn to_map(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

impl FromIterator<(String, u64)> for TallyTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        TallyTable {
            counts: iter.into_iter().collect(),
        }
    }
}
