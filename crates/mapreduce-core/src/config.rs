//! Run configuration: worker/partition counts and pluggable orderings,
//! built with the same fluent builder style used throughout this crate.

use std::sync::Arc;

use crate::order::{ByteSizeOrder, FileOrder, FootprintOrder, PartitionOrder};

/// Configuration for one call to [`crate::run`].
///
/// ```
/// use mapreduce_core::RunConfig;
///
/// let config = RunConfig::default()
///     .num_workers(8)
///     .num_partitions(16);
/// ```
pub struct RunConfig {
    pub(crate) num_workers: usize,
    pub(crate) num_partitions: usize,
    pub(crate) file_order: Arc<dyn FileOrder>,
    pub(crate) partition_order: Arc<dyn PartitionOrder>,
}

impl RunConfig {
    /// Sets the number of OS threads in the worker pool shared by the
    /// map and reduce phases.
    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Sets the number of partitions the shuffle hashes keys into.
    pub fn num_partitions(mut self, n: usize) -> Self {
        self.num_partitions = n;
        self
    }

    /// Overrides the order input files are dispatched to mappers.
    pub fn file_order(mut self, order: impl FileOrder + 'static) -> Self {
        self.file_order = Arc::new(order);
        self
    }

    /// Overrides the order partitions are dispatched to reducers.
    pub fn partition_order(mut self, order: impl PartitionOrder + 'static) -> Self {
        self.partition_order = Arc::new(order);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            num_workers: 8,
            num_partitions: 16,
            file_order: Arc::new(ByteSizeOrder),
            partition_order: Arc::new(FootprintOrder),
        }
    }
}
