use std::collections::VecDeque;

use parking_lot::Mutex;

pub type Task = Box<dyn FnOnce() + Send>;

/// Defers work to a later turn of the host's event loop.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Task);
}

/// A queue of deferred tasks drained explicitly by the host.
#[derive(Default)]
pub struct MicrotaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl MicrotaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Runs queued tasks, including ones queued while running, until the
    /// queue is empty. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            // The guard must be gone before the task runs so it can schedule.
            let Some(task) = self.tasks.lock().pop_front() else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for MicrotaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tasks_run_in_order_when_drained() {
        let queue = Arc::new(MicrotaskQueue::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            queue.schedule(Box::new(move || log.lock().push(i)));
        }
        assert_eq!(queue.pending(), 3);
        assert!(log.lock().is_empty());
        assert_eq!(queue.run_until_idle(), 3);
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn tasks_may_schedule_more_tasks() {
        let queue = Arc::new(MicrotaskQueue::new());
        let count = Arc::new(AtomicUsize::new(0));
        let inner_queue = queue.clone();
        let inner_count = count.clone();
        queue.schedule(Box::new(move || {
            inner_count.fetch_add(1, Ordering::SeqCst);
            let count = inner_count.clone();
            inner_queue.schedule(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }));
        assert_eq!(queue.run_until_idle(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
