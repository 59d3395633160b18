//! Round-robin request dispatcher over a fixed set of worker threads.
//!
//! This module defines [`WorkerPool`], an explicitly constructed and torn-down
//! resource. Every submission gets a fresh correlation id, a resolver in the
//! [`PendingTable`] and a [`Ticket`] the caller awaits.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::job::Job;
use super::message::{Completion, Request};
use super::worker::{Resolver, listen, worker_loop};
use crate::core::{CorrelationId, CorrelationIdGenerator, InsertError, PendingTable, SequentialIds};
use crate::error::{BenchError, BenchResult};

/// The caller's side of one outstanding request.
///
/// Await it from any async runtime, or call [`Ticket::wait`] from plain
/// threads. It always settles: with the worker's result, with the worker's
/// failure, or with [`BenchError::PoolDestroyed`].
#[derive(Debug)]
pub struct Ticket<O> {
    id: CorrelationId,
    worker: usize,
    rx: oneshot::Receiver<BenchResult<Completion<O>>>,
}

impl<O> Ticket<O> {
    pub fn id(&self) -> CorrelationId {
        self.id
    }

    /// Index of the worker the request was dispatched to.
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Block the current thread until the request settles.
    ///
    /// Must not be called from inside an async runtime; await the ticket there.
    pub fn wait(self) -> BenchResult<Completion<O>> {
        let worker = self.worker;
        self.rx
            .blocking_recv()
            .unwrap_or_else(|_| Err(resolver_dropped(worker)))
    }
}

impl<O> Future for Ticket<O> {
    type Output = BenchResult<Completion<O>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let worker = this.worker;
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(resolver_dropped(worker))))
    }
}

fn resolver_dropped(worker: usize) -> BenchError {
    BenchError::channel(worker, "reply resolver dropped without an answer")
}

struct WorkerHandle<I> {
    requests: Mutex<Option<mpsc::Sender<Request<I>>>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

/// A fixed-size pool of worker threads running `J`.
///
/// - Work is distributed round-robin: request `n` goes to worker `n % size`.
/// - There is no limit on outstanding requests.
/// - Replies are only ordered per worker.
pub struct WorkerPool<J: Job> {
    workers: Vec<WorkerHandle<J::Input>>,
    next_worker: AtomicUsize,
    ids: SequentialIds,
    pending: Arc<PendingTable<Resolver<J::Output>>>,
    destroyed: Arc<AtomicBool>,
}

impl<J: Job> WorkerPool<J> {
    /// Spawn `size` workers; `factory(i)` builds the job owned by worker `i`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `size` is zero, or an I/O error when
    /// a thread cannot be spawned.
    pub fn new(size: usize, mut factory: impl FnMut(usize) -> J) -> BenchResult<Self> {
        if size == 0 {
            return Err(BenchError::config("workers", "0", "a pool needs at least one worker"));
        }

        let pending = Arc::new(PendingTable::new());
        let destroyed = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(size);

        for index in 0..size {
            let (request_tx, request_rx) = mpsc::channel::<Request<J::Input>>();
            let (reply_tx, reply_rx) = mpsc::channel();
            let job = factory(index);
            let worker_destroyed = Arc::clone(&destroyed);

            let worker = thread::Builder::new()
                .name(format!("{}-worker-{}", J::NAME, index))
                .spawn(move || worker_loop(index, job, request_rx, reply_tx, worker_destroyed))
                .map_err(|e| BenchError::io("spawn worker thread", e))?;

            let listener_pending = Arc::clone(&pending);
            let listener_destroyed = Arc::clone(&destroyed);
            let listener = thread::Builder::new()
                .name(format!("{}-listener-{}", J::NAME, index))
                .spawn(move || listen(index, J::NAME, reply_rx, listener_pending, listener_destroyed))
                .map_err(|e| BenchError::io("spawn listener thread", e))?;

            workers.push(WorkerHandle {
                requests: Mutex::new(Some(request_tx)),
                threads: Mutex::new(vec![worker, listener]),
            });
        }

        tracing::debug!("{} pool started with {size} workers", J::NAME);

        Ok(Self {
            workers,
            next_worker: AtomicUsize::new(0),
            ids: SequentialIds::new(),
            pending,
            destroyed,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Number of requests still waiting for a reply.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Advances the round-robin counter and returns the worker it lands on.
    fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Send `data` to the next worker.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::PoolDestroyed`] once [`destroy`](Self::destroy)
    /// has run, or a channel error if the chosen worker has stopped.
    pub fn submit(&self, data: J::Input, transferable: bool) -> BenchResult<Ticket<J::Output>> {
        if self.is_destroyed() {
            return Err(BenchError::pool_destroyed(None));
        }

        let worker = self.next_worker_index();
        let id = self.ids.generate();
        let (tx, rx) = oneshot::channel();

        self.pending.insert(id, tx).map_err(|e| match e {
            InsertError::Closed(_) => BenchError::pool_destroyed(Some(id)),
            InsertError::Duplicate(_) => {
                BenchError::channel(worker, format!("correlation id {id} already pending"))
            }
        })?;

        let request = Request {
            id,
            data,
            transferable,
        };
        let sent = match self.workers[worker].requests.lock().as_ref() {
            Some(requests) => requests.send(request).is_ok(),
            None => false,
        };

        if !sent {
            self.pending.take(id);
            return Err(if self.is_destroyed() {
                BenchError::pool_destroyed(Some(id))
            } else {
                BenchError::channel(worker, "worker has stopped")
            });
        }

        tracing::trace!(
            "{} request {id} dispatched to worker {worker} (transferable: {transferable})",
            J::NAME
        );
        Ok(Ticket { id, worker, rx })
    }

    /// Tear the pool down.
    ///
    /// Every pending ticket is rejected with [`BenchError::PoolDestroyed`],
    /// request channels are closed, workers exit after their current job
    /// without touching queued requests, and all threads are joined. Replies
    /// produced afterwards are discarded. Calling it again is a no-op.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }

        let abandoned = self.pending.close();
        if !abandoned.is_empty() {
            tracing::debug!(
                "{} pool rejecting {} pending requests",
                J::NAME,
                abandoned.len()
            );
        }
        for (id, resolver) in abandoned {
            let _ = resolver.send(Err(BenchError::pool_destroyed(Some(id))));
        }

        for handle in &self.workers {
            handle.requests.lock().take();
        }
        for (index, handle) in self.workers.iter().enumerate() {
            for thread in handle.threads.lock().drain(..) {
                if thread.join().is_err() {
                    tracing::warn!("{} worker {index} thread panicked during shutdown", J::NAME);
                }
            }
        }

        tracing::debug!("{} pool destroyed", J::NAME);
    }
}

impl<J: Job> Drop for WorkerPool<J> {
    fn drop(&mut self) {
        self.destroy();
    }
}
