//! The worker pool: a fixed number of OS threads pulling jobs off a
//! shared [`JobQueue`].
//!
//! Each worker has its own busy-mutex. A worker holds its busy-mutex
//! locked for the duration of running a job, and nothing else; this is
//! what lets [`WorkerPool::quiesce`] detect "every worker is idle and
//! the queue is empty" without a separate barrier primitive.

use crate::error::{Error, Result};
use crate::queue::{Job, JobQueue};
use crate::sync::{thread, Arc, Mutex};

/// A fixed-size pool of worker threads draining a single job queue.
pub(crate) struct WorkerPool {
    queue: Arc<JobQueue>,
    busy: Vec<Arc<Mutex<()>>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `num_workers` threads, each running [`worker_loop`].
    ///
    /// `spec.md`'s `Create(W)` has each worker discover its own index by
    /// taking a startup barrier, then linear-scanning `threads[]` once
    /// every slot is populated -- that dance exists only because the
    /// array isn't fully written until every spawn has returned. Here
    /// `id` is simply moved into the spawned closure, so each worker
    /// already knows its index the moment it starts; there is no data
    /// race for a barrier to guard against, so the barrier itself has no
    /// Rust-native counterpart.
    pub(crate) fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(Error::Configuration("num_workers must be greater than zero"));
        }

        let queue = Arc::new(JobQueue::new());
        let busy: Vec<Arc<Mutex<()>>> = (0..num_workers).map(|_| Arc::new(Mutex::new(()))).collect();

        let mut workers = Vec::with_capacity(num_workers);
        for (id, busy_lock) in busy.iter().enumerate() {
            let queue = Arc::clone(&queue);
            let busy_lock = Arc::clone(busy_lock);
            workers.push(thread::spawn(move || worker_loop(id, queue, busy_lock)));
        }

        Ok(WorkerPool {
            queue,
            busy,
            workers,
        })
    }

    /// Enqueues `task` for some worker to run.
    pub(crate) fn submit(&self, task: Box<dyn FnOnce() + Send + 'static>) {
        self.queue.push(Job::task(task));
    }

    /// Blocks until every submitted job has finished and every worker is
    /// idle.
    ///
    /// Waits for the queue to drain, then -- still holding the queue
    /// lock acquired by [`JobQueue::wait_empty`] -- acquires and
    /// immediately releases each worker's busy-mutex in turn. Holding the
    /// queue lock across that walk is what prevents a race where a
    /// worker pops a fresh job (pushed by some other thread) after the
    /// queue was observed empty but before its busy-mutex was checked:
    /// `pop` cannot return to that worker while this thread holds the
    /// queue lock, so a worker is either already blocked in `pop`
    /// (idle) or has already released its busy-mutex from a prior job.
    pub(crate) fn quiesce(&self) {
        let guard = self.queue.wait_empty();
        for busy_lock in &self.busy {
            drop(busy_lock.lock().unwrap());
        }
        drop(guard);
    }

    /// Pushes one poison pill per worker and joins every thread,
    /// consuming the pool.
    pub(crate) fn shutdown(self) {
        for _ in &self.busy {
            self.queue.push(Job::poison());
        }
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

/// A worker's main loop: pop a job, mark busy, run it, repeat; exit on a
/// poison pill.
fn worker_loop(id: usize, queue: Arc<JobQueue>, busy: Arc<Mutex<()>>) {
    loop {
        let (job, guard) = queue.pop();
        if job.is_poison() {
            drop(guard);
            eprintln!("[worker-{id}] received poison pill, exiting");
            return;
        }
        let busy_guard = busy.lock().unwrap();
        drop(guard);
        job.run();
        drop(busy_guard);
    }
}
