//! `run`: the entry point that wires the worker pool, the partition
//! store, and the caller's mapper/reducer together for one map/shuffle/
//! reduce pass.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::order::stable_order_by;
use crate::partition::PartitionStore;
use crate::pool::WorkerPool;
use crate::sync::Arc;

/// Passed to the mapper callback. Every `emit` deposits one pair into
/// the partition selected by [`crate::partitioner::partition_of`].
pub struct MapContext {
    store: Arc<PartitionStore>,
}

impl MapContext {
    /// Deposits `(key, value)` into the partition store.
    ///
    /// Always succeeds in this implementation (see `DESIGN.md` on the
    /// Emit-failure Open Question); the `Result` return is part of the
    /// public contract so a future bounded-capacity store can report
    /// backpressure without an API break.
    pub fn emit(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.store.emit(key, value);
        Ok(())
    }
}

/// Passed to the reducer callback. `get_next` pops the next value for
/// `key` out of `partition_index`, or `None` once every pair with that
/// key has been drained.
pub struct ReduceContext {
    store: Arc<PartitionStore>,
}

impl ReduceContext {
    /// Pops the next value for `key` from `partition_index`.
    pub fn get_next(&self, key: &[u8], partition_index: usize) -> Option<Vec<u8>> {
        self.store.get_next(partition_index, key)
    }
}

/// Runs one map/shuffle/reduce pass over `files`.
///
/// 1. Validates `config` (`num_workers`/`num_partitions` both nonzero).
/// 2. Creates the worker pool and partition store.
/// 3. Submits one map job per file, ordered ascending by
///    `config.file_order` (stable sort -- B1/S6).
/// 4. Quiesces: every `emit` from every mapper has completed.
/// 5. Submits one reduce-driver job per partition, ordered ascending by
///    `config.partition_order`; each job repeatedly takes the partition's
///    current head key, invokes the reducer with it, and relies on the
///    reducer to drain every pair under that key via `get_next` before
///    returning, until the partition is empty.
/// 6. Quiesces again: every reduce job has completed.
/// 7. Tears the pool down.
pub fn run<M, R>(files: &[impl AsRef<str>], mapper: M, reducer: R, config: RunConfig) -> Result<()>
where
    M: Fn(&str, &MapContext) + Send + Sync + 'static,
    R: Fn(&[u8], usize, &ReduceContext) + Send + Sync + 'static,
{
    if config.num_workers == 0 {
        eprintln!("[mapreduce] configuration error: num_workers must be greater than zero");
        return Err(Error::Configuration("num_workers must be greater than zero"));
    }
    if config.num_partitions == 0 {
        eprintln!("[mapreduce] configuration error: num_partitions must be greater than zero");
        return Err(Error::Configuration("num_partitions must be greater than zero"));
    }

    let pool = WorkerPool::new(config.num_workers)?;
    let store = Arc::new(PartitionStore::new(config.num_partitions));
    let mapper = Arc::new(mapper);
    let reducer = Arc::new(reducer);

    let names: Vec<String> = files.iter().map(|f| f.as_ref().to_string()).collect();
    let file_order = stable_order_by(&names, |_, name| config.file_order.key(name));
    for idx in file_order {
        let file_name = names[idx].clone();
        let mapper = Arc::clone(&mapper);
        let ctx = MapContext {
            store: Arc::clone(&store),
        };
        pool.submit(Box::new(move || mapper(&file_name, &ctx)));
    }
    pool.quiesce();

    let footprints: Vec<usize> = (0..store.num_partitions())
        .map(|i| store.footprint_bytes(i))
        .collect();
    let partition_order = stable_order_by(&footprints, |i, &bytes| config.partition_order.key(i, bytes));
    for partition_index in partition_order {
        let reducer = Arc::clone(&reducer);
        let store = Arc::clone(&store);
        pool.submit(Box::new(move || {
            let ctx = ReduceContext {
                store: Arc::clone(&store),
            };
            while let Some(key) = store.head_key(partition_index) {
                reducer(&key, partition_index, &ctx);
            }
        }));
    }
    pool.quiesce();

    pool.shutdown();
    Ok(())
}
