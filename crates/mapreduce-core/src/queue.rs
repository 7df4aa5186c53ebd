//! The job queue: a FIFO with condition signaling for "not empty" and
//! "empty", shared between the driver and every worker thread.
//!
//! `pop` deliberately returns with the queue lock still held -- see its
//! doc comment. That handoff is what makes [`crate::pool::WorkerPool::quiesce`]
//! correct: a worker can mark itself busy before anyone else can observe
//! the queue as empty.

use std::collections::VecDeque;

use crate::sync::{Condvar, Mutex, MutexGuard};

/// A unit of work. `None` is a poison pill: workers that pop one exit
/// their main loop instead of running anything.
pub(crate) struct Job {
    task: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Job {
    pub(crate) fn task(f: Box<dyn FnOnce() + Send + 'static>) -> Self {
        Job { task: Some(f) }
    }

    pub(crate) fn poison() -> Self {
        Job { task: None }
    }

    pub(crate) fn is_poison(&self) -> bool {
        self.task.is_none()
    }

    pub(crate) fn run(self) {
        if let Some(f) = self.task {
            f();
        }
    }
}

pub(crate) struct QueueState {
    jobs: VecDeque<Job>,
}

pub(crate) struct JobQueue {
    state: Mutex<QueueState>,
    not_empty: Condvar,
    empty: Condvar,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        JobQueue {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
            }),
            not_empty: Condvar::new(),
            empty: Condvar::new(),
        }
    }

    /// Appends `job` at the tail. Broadcasts `not_empty` exactly on the
    /// `0 -> 1` size transition (J3); FIFO order between pushes is
    /// preserved regardless.
    pub(crate) fn push(&self, job: Job) {
        let mut state = self.state.lock().unwrap();
        let was_empty = state.jobs.is_empty();
        state.jobs.push_back(job);
        drop(state);
        if was_empty {
            self.not_empty.notify_all();
        }
    }

    /// Blocks until a job is available, then detaches and returns it --
    /// **with the queue lock still held**.
    ///
    /// This is the one deliberately unusual part of the design: the
    /// caller (a worker) must acquire its own busy-mutex before dropping
    /// the returned guard, so that `quiesce`, once it reacquires this
    /// same lock after `wait_empty`, can never observe a worker that has
    /// popped a job but not yet declared itself busy.
    pub(crate) fn pop(&self) -> (Job, MutexGuard<'_, QueueState>) {
        let mut state = self.state.lock().unwrap();
        while state.jobs.is_empty() {
            state = self.not_empty.wait(state).unwrap();
        }
        let job = state.jobs.pop_front().expect("queue non-empty by loop guard");
        if state.jobs.is_empty() {
            self.empty.notify_one();
        }
        (job, state)
    }

    /// Blocks until the queue is empty, returning with the lock held so
    /// the caller can extend the critical section (used by `quiesce` to
    /// also check every worker's busy-mutex before anyone can push again).
    pub(crate) fn wait_empty(&self) -> MutexGuard<'_, QueueState> {
        let mut state = self.state.lock().unwrap();
        while !state.jobs.is_empty() {
            state = self.empty.wait(state).unwrap();
        }
        state
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }
}
