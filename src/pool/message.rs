//! Messages exchanged between the dispatcher and its workers.

use crate::core::CorrelationId;
use crate::error::{BenchError, BenchResult};

/// Unit of work sent to one worker.
#[derive(Debug)]
pub struct Request<I> {
    pub id: CorrelationId,
    pub data: I,
    /// Whether ownership of `data` was moved to the worker instead of copied.
    pub transferable: bool,
}

/// A worker's answer to one [`Request`].
#[derive(Debug)]
pub struct Reply<O> {
    pub id: CorrelationId,
    /// The job's result, or the failure message the worker caught.
    pub outcome: Result<O, String>,
    /// Echoed as `Some(false)` only when the payload was copied.
    pub transferable: Option<bool>,
}

impl<O> Reply<O> {
    pub fn ok(id: CorrelationId, result: O, transferable: bool) -> Self {
        Self {
            id,
            outcome: Ok(result),
            transferable: echo(transferable),
        }
    }

    pub fn failed(id: CorrelationId, message: impl Into<String>, transferable: bool) -> Self {
        Self {
            id,
            outcome: Err(message.into()),
            transferable: echo(transferable),
        }
    }

    /// Turn the wire reply into what the caller's ticket resolves to.
    pub fn into_completion(self, worker: usize) -> BenchResult<Completion<O>> {
        match self.outcome {
            Ok(result) => Ok(Completion {
                id: self.id,
                worker,
                result,
                transferable: self.transferable,
            }),
            Err(message) => Err(BenchError::worker(worker, self.id, message)),
        }
    }
}

fn echo(transferable: bool) -> Option<bool> {
    if transferable { None } else { Some(false) }
}

/// A successfully completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion<O> {
    pub id: CorrelationId,
    /// Index of the worker that handled the request.
    pub worker: usize,
    pub result: O,
    pub transferable: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_flag_is_echoed_only_when_copied() {
        assert_eq!(Reply::ok(1, (), true).transferable, None);
        assert_eq!(Reply::ok(1, (), false).transferable, Some(false));
        assert_eq!(Reply::<()>::failed(1, "x", false).transferable, Some(false));
    }

    #[test]
    fn failed_reply_becomes_worker_error() {
        let err = Reply::<u8>::failed(9, "bad input", true).into_completion(3).unwrap_err();
        assert_eq!(err.category(), "worker");
        assert_eq!(err.correlation_id(), Some(9));
        assert!(err.to_string().contains("bad input"));
    }

    #[test]
    fn ok_reply_keeps_id_and_worker() {
        let done = Reply::ok(4, vec![1u8, 2], false).into_completion(1).unwrap();
        assert_eq!(done.id, 4);
        assert_eq!(done.worker, 1);
        assert_eq!(done.result, vec![1, 2]);
        assert_eq!(done.transferable, Some(false));
    }
}
