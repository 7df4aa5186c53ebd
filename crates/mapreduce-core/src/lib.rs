//! In-process MapReduce: a fixed worker pool runs a user mapper over a
//! set of input files, shuffles the emitted pairs into key-sorted,
//! DJB2-hashed partitions, then runs a user reducer once per partition.
//!
//! ```text
//!           +------------+        +----------------+        +-------------+
//! files --> | file order |------->|  Worker Pool   |------->| Partition   |
//!           +------------+  map   | (shared queue) |  emit  | Store (P)   |
//!                            jobs +----------------+------->| partitions  |
//!                                         |  quiesce        +-------------+
//!                                         v                        |
//!                                 +----------------+   get_next     |
//!                                 |  Worker Pool   |<---------------+
//!                                 | (shared queue) |  reduce jobs,
//!                                 +----------------+  partition-order
//! ```
//!
//! The worker pool is reused across both phases: one `quiesce` between
//! map and reduce is the shuffle boundary -- every `emit` has landed
//! before any `get_next` runs.
//!
//! See [`run`] for the entry point.

mod config;
mod driver;
mod error;
mod order;
mod partition;
mod partitioner;
mod pool;
mod queue;
mod sync;

pub use config::RunConfig;
pub use driver::{run, MapContext, ReduceContext};
pub use error::{Error, Result};
pub use order::{ByteSizeOrder, FileOrder, FileOrderKey, FootprintOrder, PartitionOrder};
pub use partitioner::partition_of;
