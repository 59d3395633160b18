use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};

use tokio::sync::oneshot;

use super::job::Job;
use super::message::{Completion, Reply, Request};
use crate::core::PendingTable;
use crate::error::BenchResult;

/// Completes one caller's ticket.
pub(crate) type Resolver<O> = oneshot::Sender<BenchResult<Completion<O>>>;

/// Worker thread body: run the job for every request until the request
/// channel closes or the pool is torn down.
///
/// Failures never drop a reply: job errors and panics are both sent back as
/// failed replies carrying the request's id.
pub(crate) fn worker_loop<J: Job>(
    worker_id: usize,
    mut job: J,
    requests: Receiver<Request<J::Input>>,
    replies: Sender<Reply<J::Output>>,
    destroyed: Arc<AtomicBool>,
) {
    tracing::trace!("{} worker {worker_id} started", J::NAME);

    while let Ok(Request {
        id,
        data,
        transferable,
    }) = requests.recv()
    {
        // Requests still queued at teardown were already rejected.
        if destroyed.load(Ordering::Acquire) {
            break;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.run(data, transferable)));
        let reply = match outcome {
            Ok(Ok(result)) => Reply::ok(id, result, transferable),
            Ok(Err(e)) => Reply::failed(id, e.to_string(), transferable),
            Err(payload) => Reply::failed(id, panic_message(payload.as_ref()), transferable),
        };

        if replies.send(reply).is_err() {
            tracing::warn!("{} worker {worker_id} lost its listener; stopping", J::NAME);
            break;
        }
    }

    tracing::trace!("{} worker {worker_id} stopped", J::NAME);
}

/// Listener thread body: resolve the pending ticket matching each reply.
///
/// Replies that arrive after teardown, or for ids no longer pending, are
/// discarded.
pub(crate) fn listen<O: Send + 'static>(
    worker_id: usize,
    name: &'static str,
    replies: Receiver<Reply<O>>,
    pending: Arc<PendingTable<Resolver<O>>>,
    destroyed: Arc<AtomicBool>,
) {
    while let Ok(reply) = replies.recv() {
        let id = reply.id;
        if destroyed.load(Ordering::Acquire) {
            tracing::debug!("{name} listener {worker_id} discarding reply {id} after teardown");
            continue;
        }

        match pending.take(id) {
            Some(resolver) => {
                // The caller may have dropped its ticket; nothing left to do then.
                let _ = resolver.send(reply.into_completion(worker_id));
                tracing::trace!("{name} worker {worker_id} resolved request {id}");
            }
            None => tracing::warn!("{name} worker {worker_id} replied to unknown request {id}"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}
