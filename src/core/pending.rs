//! # Pending Request Table
//!
//! Maps each outstanding [`CorrelationId`] to the single-use resolver that
//! completes its caller.
//!
//! ## Semantics
//!
//! - `insert` registers a resolver; a second insert for a live id is refused
//! - `take` removes and returns the resolver; it succeeds at most once per id
//! - `close` refuses every later insert and hands back all live resolvers so
//!   the owner can reject them
//!
//! Insert, take and close all run under one lock, so for a given id they never
//! interleave.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::CorrelationId;

/// Why an insert was refused. The resolver is handed back so the caller can
/// still complete it.
#[derive(Debug)]
pub enum InsertError<T> {
    /// The table was closed by pool teardown.
    Closed(T),
    /// A live entry already uses this id.
    Duplicate(T),
}

impl<T> InsertError<T> {
    pub fn into_inner(self) -> T {
        match self {
            InsertError::Closed(resolver) | InsertError::Duplicate(resolver) => resolver,
        }
    }
}

#[derive(Debug)]
struct Inner<T> {
    entries: HashMap<CorrelationId, T>,
    closed: bool,
}

/// Table of requests awaiting a reply.
#[derive(Debug)]
pub struct PendingTable<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for PendingTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingTable<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                closed: false,
            }),
        }
    }

    /// Register `resolver` under `id`.
    pub fn insert(&self, id: CorrelationId, resolver: T) -> Result<(), InsertError<T>> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(InsertError::Closed(resolver));
        }
        if inner.entries.contains_key(&id) {
            return Err(InsertError::Duplicate(resolver));
        }
        inner.entries.insert(id, resolver);
        Ok(())
    }

    /// Remove the resolver for `id`, if it is still live.
    pub fn take(&self, id: CorrelationId) -> Option<T> {
        self.inner.lock().entries.remove(&id)
    }

    /// Close the table and drain every live entry, ordered by id.
    ///
    /// Closing twice returns an empty list the second time.
    pub fn close(&self) -> Vec<(CorrelationId, T)> {
        let mut inner = self.inner.lock();
        inner.closed = true;
        let mut drained: Vec<_> = inner.entries.drain().collect();
        drained.sort_unstable_by_key(|(id, _)| *id);
        drained
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub fn contains(&self, id: CorrelationId) -> bool {
        self.inner.lock().entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
