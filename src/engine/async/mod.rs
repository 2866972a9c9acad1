use std::{
    collections::VecDeque,
    sync::{
        Arc, Condvar, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread::{Builder, JoinHandle},
};

use log::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

type JobQueue = Arc<(Mutex<VecDeque<Job>>, Condvar)>;

fn lock(queue: &Mutex<VecDeque<Job>>) -> MutexGuard<'_, VecDeque<Job>> {
    // A panicking job cannot leave the queue itself half-updated.
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Fixed set of worker threads pulling boxed jobs off a shared queue.
/// Dropping the pool lets queued jobs finish, then joins the workers.
pub struct ThreadPool {
    workers: Vec<JoinHandle<()>>,
    job_queue: JobQueue,
    is_running: Arc<AtomicBool>,
}

impl ThreadPool {
    pub fn new(num_threads: usize) -> Self {
        let job_queue: JobQueue = Arc::new((Mutex::new(VecDeque::new()), Condvar::new()));
        let is_running = Arc::new(AtomicBool::new(true));
        let mut workers = Vec::new();

        for id in 0..num_threads.max(1) {
            let queue = Arc::clone(&job_queue);
            let running = Arc::clone(&is_running);

            let spawned = Builder::new()
                .name(format!("gallery-worker-{id}"))
                .spawn(move || worker(queue, running));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => warn!("failed to spawn worker {id}: {err}"),
            }
        }
        debug!("thread pool started with {} workers", workers.len());

        Self {
            workers,
            job_queue,
            is_running,
        }
    }

    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let (queue, cvar) = &*self.job_queue;
        lock(queue).push_back(Box::new(job));
        cvar.notify_one();
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let (queue, cvar) = &*self.job_queue;
        {
            // Flip the flag under the lock so no worker misses the wakeup.
            let _guard = lock(queue);
            self.is_running.store(false, Ordering::Release);
        }
        cvar.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.stop();
        }
    }
}

fn worker(queue: JobQueue, running: Arc<AtomicBool>) {
    loop {
        let job = {
            let (lock_queue, cvar) = &*queue;
            let mut jobs = lock(lock_queue);
            loop {
                if let Some(job) = jobs.pop_front() {
                    break job;
                }
                if !running.load(Ordering::Acquire) {
                    return;
                }
                jobs = cvar
                    .wait(jobs)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
        };
        job();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{atomic::AtomicUsize, mpsc},
        time::Duration,
    };

    use super::*;

    #[test]
    fn runs_submitted_jobs() {
        let pool = ThreadPool::new(2);
        let (tx, rx) = mpsc::channel();
        for i in 0..8 {
            let tx = tx.clone();
            pool.submit(move || {
                let _ = tx.send(i);
            });
        }
        let mut seen: Vec<i32> = (0..8)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        seen.sort();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn shutdown_drains_the_queue() {
        let pool = ThreadPool::new(1);
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..16 {
            let count = Arc::clone(&count);
            pool.submit(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();
        assert_eq!(count.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn drop_joins_idle_workers() {
        let pool = ThreadPool::new(3);
        drop(pool);
    }
}
