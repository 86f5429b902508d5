//! Per-round worker pool.
//!
//! Each round spawns a fixed number of scoped threads, feeds them every item
//! index through a [`MatchQueue`] followed by one terminate item per worker,
//! and joins them all before returning. The slice of items stays mutably
//! borrowed for the whole round, so nothing can restructure the collection
//! while workers hold references into it; each worker gets exclusive access
//! to exactly the items it dequeues.

use std::thread;

use tracing::debug;

use crate::assembly::engine::AssemblyError;
use crate::assembly::queue::MatchQueue;

/// Work handed to a worker thread
#[derive(Debug)]
pub enum WorkItem<'a, T> {
    /// Process the item at `index`
    Process { index: usize, item: &'a mut T },
    /// Stop consuming; exactly one per worker per round
    Terminate,
}

/// Totals gathered from the workers of one round
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// Items processed
    pub jobs: usize,
    /// Sum of the values returned by the job function
    pub bases_added: usize,
}

impl RoundReport {
    fn merge(&mut self, other: RoundReport) {
        self.jobs += other.jobs;
        self.bases_added += other.bases_added;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job` once on every item using `workers` threads
    ///
    /// Returns after all workers have been joined.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError::WorkerSpawn` if a thread cannot be created
    /// (threads already running are terminated first), or
    /// `AssemblyError::WorkerPanicked` with the lowest id of any worker that
    /// panicked, once every worker has been joined.
    pub fn run_round<T, F>(&self, items: &mut [T], job: F) -> Result<RoundReport, AssemblyError>
    where
        T: Send,
        F: Fn(usize, &mut T) -> usize + Sync,
    {
        let queue: MatchQueue<WorkItem<'_, T>> = MatchQueue::new();
        let queue = &queue;
        let job = &job;
        let workers = self.workers;

        thread::scope(move |s| {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let spawned = thread::Builder::new()
                    .name(format!("afin-worker-{id}"))
                    .spawn_scoped(s, move || worker_loop(id, queue, job));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        for _ in 0..handles.len() {
                            queue.push(WorkItem::Terminate);
                        }
                        return Err(AssemblyError::WorkerSpawn {
                            requested: workers,
                            spawned: handles.len(),
                            source,
                        });
                    }
                }
            }

            for (index, item) in items.iter_mut().enumerate() {
                queue.push(WorkItem::Process { index, item });
            }
            for _ in 0..workers {
                queue.push(WorkItem::Terminate);
            }

            // Every handle is joined before any panic is reported
            let mut report = RoundReport::default();
            let mut panicked = None;
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(tally) => report.merge(tally),
                    Err(_) => {
                        debug!(worker = id, "worker panicked");
                        panicked.get_or_insert(id);
                    }
                }
            }
            match panicked {
                Some(id) => Err(AssemblyError::WorkerPanicked(id)),
                None => Ok(report),
            }
        })
    }
}

fn worker_loop<T, F>(id: usize, queue: &MatchQueue<WorkItem<'_, T>>, job: &F) -> RoundReport
where
    F: Fn(usize, &mut T) -> usize,
{
    let mut tally = RoundReport::default();
    loop {
        match queue.pop() {
            WorkItem::Terminate => break,
            WorkItem::Process { index, item } => {
                tally.bases_added += job(index, item);
                tally.jobs += 1;
            }
        }
    }
    debug!(worker = id, jobs = tally.jobs, "worker finished");
    tally
}
