//! Parallel partition loading

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

use gm_core::{Dataset, Record};

use crate::sources::GameSource;

/// Completed/total partition counters shared with the progress bar
#[derive(Debug, Default)]
pub struct LoadProgress {
    total: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
    }

    /// Count one finished partition, successful or not
    pub fn mark_done(&self, failed: bool) {
        if failed {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => (self.completed() as f32 / total as f32).min(1.0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total() > 0 && self.completed() >= self.total()
    }
}

/// One partition that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionFailure {
    pub index: usize,
    pub error: String,
}

/// Outcome of a full load
#[derive(Debug)]
pub struct LoadReport {
    pub source_name: String,
    pub dataset: Dataset,
    pub loaded: usize,
    pub failures: Vec<PartitionFailure>,
}

/// Fetch every partition in parallel and wait for all of them.
///
/// Failed partitions are logged and left out; the dataset is assembled from
/// the rest in partition order.
pub async fn load_dataset(source: &dyn GameSource, progress: &LoadProgress) -> LoadReport {
    let indices = source.partition_indices();
    progress.reset(indices.len());
    tracing::info!("Loading {} partitions from {}", indices.len(), source.source_name());

    let results = join_all(indices.iter().map(|&index| async move {
        let result = source.load_partition(index).await;
        progress.mark_done(result.is_err());
        (index, result)
    }))
    .await;

    let mut records: Vec<Record> = Vec::new();
    let mut failures = Vec::new();
    let mut loaded = 0;
    for (index, result) in results {
        match result {
            Ok(partition) => {
                loaded += 1;
                records.extend(partition.records);
            }
            Err(e) => {
                tracing::warn!("Partition {} failed: {}", index, e);
                failures.push(PartitionFailure { index, error: e.to_string() });
            }
        }
    }

    let dataset = Dataset::from_records(records);
    tracing::info!(
        "Loaded {} games from {}/{} partitions",
        dataset.len(),
        loaded,
        indices.len()
    );

    LoadReport {
        source_name: source.source_name().to_string(),
        dataset,
        loaded,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Partition;
    use crate::DataError;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Partition `i` holds one game with id `i`; listed indices fail
    struct FakeSource {
        indices: Vec<usize>,
        failing: Vec<usize>,
    }

    #[async_trait]
    impl GameSource for FakeSource {
        fn partition_indices(&self) -> Vec<usize> {
            self.indices.clone()
        }

        async fn load_partition(&self, index: usize) -> Result<Partition, DataError> {
            // Later partitions finish first
            tokio::time::sleep(Duration::from_millis(10 * (10 - index as u64))).await;
            if self.failing.contains(&index) {
                return Err(DataError::PartitionMissing(index));
            }
            Ok(Partition {
                index,
                records: vec![Record::new(index.to_string(), format!("Game {}", index))],
            })
        }

        fn source_name(&self) -> &str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_failed_partitions_are_excluded() {
        let source = FakeSource { indices: vec![1, 2, 3, 4], failing: vec![2] };
        let progress = LoadProgress::new();

        let report = load_dataset(&source, &progress).await;

        let ids: Vec<_> = report.dataset.records().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
        assert_eq!(report.loaded, 3);
        assert_eq!(report.failures, vec![PartitionFailure { index: 2, error: "Partition 2 is missing".to_string() }]);
        assert_eq!(progress.completed(), 4);
        assert_eq!(progress.failed(), 1);
        assert!(progress.is_finished());
        assert_eq!(progress.fraction(), 1.0);
    }

    #[tokio::test]
    async fn test_all_partitions_failing_yields_empty_dataset() {
        let source = FakeSource { indices: vec![1, 2], failing: vec![1, 2] };
        let report = load_dataset(&source, &LoadProgress::new()).await;
        assert!(report.dataset.is_empty());
        assert_eq!(report.failures.len(), 2);
    }
}
