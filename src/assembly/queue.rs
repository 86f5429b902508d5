//! Blocking FIFO shared between the run manager and extension workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};

/// Unbounded thread-safe FIFO
///
/// `push` never blocks and wakes one waiting consumer; `pop` blocks until an
/// item is available. Termination is signalled in-band: producers enqueue
/// one terminate item per consumer.
#[derive(Debug)]
pub struct MatchQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> MatchQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Append an item and wake one waiting consumer
    pub fn push(&self, item: T) {
        // The deque is never left mid-update, so a poisoned lock is still usable
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.push_back(item);
        drop(items);
        self.not_empty.notify_one();
    }

    /// Remove the oldest item, blocking while the queue is empty
    pub fn pop(&self) -> T {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .not_empty
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for MatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_fifo_order() {
        let queue = MatchQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 5);
        let popped: Vec<i64> = (0..5).map(|_| queue.pop()).collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_waits_for_push() {
        let queue = MatchQueue::new();
        thread::scope(|s| {
            let consumer = s.spawn(|| queue.pop());
            thread::sleep(std::time::Duration::from_millis(20));
            queue.push(42);
            assert_eq!(consumer.join().unwrap(), 42);
        });
    }

    #[test]
    fn test_sentinel_per_worker_drains_every_job_once() {
        const WORKERS: usize = 8;
        const JOBS: i64 = 1000;

        let queue = MatchQueue::new();
        let results: Vec<(Vec<i64>, usize)> = thread::scope(|s| {
            let handles: Vec<_> = (0..WORKERS)
                .map(|_| {
                    s.spawn(|| {
                        let mut seen = Vec::new();
                        let mut sentinels = 0;
                        loop {
                            let item: i64 = queue.pop();
                            if item == -1 {
                                sentinels += 1;
                                break;
                            }
                            seen.push(item);
                        }
                        (seen, sentinels)
                    })
                })
                .collect();

            for job in 0..JOBS {
                queue.push(job);
            }
            for _ in 0..WORKERS {
                queue.push(-1);
            }

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut all = HashSet::new();
        let mut total = 0;
        for (seen, sentinels) in &results {
            assert_eq!(*sentinels, 1);
            total += seen.len();
            all.extend(seen.iter().copied());
        }
        assert_eq!(total, JOBS as usize);
        assert_eq!(all.len(), JOBS as usize);
        assert!(queue.is_empty());
    }
}
