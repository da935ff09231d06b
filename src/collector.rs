//! Parallel collection of attribute statistics from a folder of record files.

use crate::attribute::Attribute;
use crate::errors::{CollectionFailed, EmptyInput, Result};
use crate::parallelism;
use crate::parse;
use crate::tally::TallyTable;
use itertools::Itertools;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Files with this name suffix are read.
pub const EXTENSION: &str = ".json";

/// Default size of the worker pool.
pub const DEFAULT_THREADS: usize = 4;

/// The `.json` files directly inside `dir`, sorted by path.
pub fn eligible_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let eligible = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(EXTENSION));
        if eligible && path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(EmptyInput(dir.to_owned()).into());
    }
    files.sort();
    Ok(files)
}

pub struct Collector {
    threads: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Collector::new(DEFAULT_THREADS)
    }
}

impl Collector {
    /// A collector with a pool of `threads` workers; 0 means one per CPU.
    pub fn new(threads: usize) -> Collector {
        let threads = if threads == 0 {
            num_cpus::get()
        } else {
            threads
        };
        Collector { threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Count the values of `attribute` over all records in `dir`.
    ///
    /// Every file is processed even if some of them fail. If any file fails,
    /// the result is a [CollectionFailed] carrying the first failure.
    pub fn collect(&self, dir: &Path, attribute: Attribute) -> Result<TallyTable> {
        let files = eligible_files(dir)?;
        let total = files.len();
        info!(
            target: "gamestats",
            "collecting {attribute} from {total} files in {} with {} threads",
            dir.display(),
            self.threads
        );
        let tally = TallyTable::new();
        let outcomes = parallelism::run_jobs(files, self.threads, |path| {
            let records = parse::count_file(&path, attribute, &tally)?;
            debug!(target: "gamestats", "{}: {records} records", path.display());
            Ok(records)
        });
        let mut records = 0;
        let mut failures = vec![];
        for outcome in outcomes {
            match outcome {
                Ok(n) => records += n,
                Err(e) => {
                    warn!(target: "gamestats", "{e}");
                    failures.push(e);
                }
            }
        }
        let failed = failures.len();
        if let Some(cause) = failures.into_iter().next() {
            return Err(CollectionFailed {
                failed,
                total,
                cause,
            }
            .into());
        }
        info!(
            target: "gamestats",
            "{records} records, {} distinct values: {}",
            tally.len(),
            summary(&tally)
        );
        Ok(tally)
    }
}

/// Count the values of `attribute` in `dir` with the default pool size.
pub fn collect(dir: &Path, attribute: Attribute) -> Result<TallyTable> {
    Collector::default().collect(dir, attribute)
}

fn summary(tally: &TallyTable) -> String {
    const SHOWN: usize = 5;
    let top = tally
        .sorted()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect_vec();
    let shown = top
        .iter()
        .take(SHOWN)
        .map(|(value, count)| format!("{value} ({count})"))
        .join(", ");
    if top.len() > SHOWN {
        shown + ", ..."
    } else {
        shown
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn summary_top_values() {
        let t: TallyTable = [("a", 1), ("b", 3), ("c", 3), ("d", 2), ("e", 1), ("f", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        assert_eq!(summary(&t), "b (3), c (3), d (2), a (1), e (1), ...");
        let t: TallyTable = [("x".to_owned(), 2)].into_iter().collect();
        assert_eq!(summary(&t), "x (2)");
    }

    #[test]
    fn zero_threads_means_per_cpu() {
        assert_eq!(Collector::new(0).threads(), num_cpus::get());
        assert_eq!(Collector::new(3).threads(), 3);
        assert_eq!(Collector::default().threads(), DEFAULT_THREADS);
    }
}
