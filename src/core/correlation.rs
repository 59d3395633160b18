//! Correlation identifiers link an outgoing request to its eventual reply.

use std::sync::atomic::{AtomicU64, Ordering};

pub type CorrelationId = u64;

pub trait CorrelationIdGenerator {
    fn generate(&self) -> CorrelationId;
}

/// Ever-incrementing id source scoped to one pool instance.
///
/// Ids start at 0 and are never reused for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(first: CorrelationId) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The id the next call to `generate` will return.
    pub fn peek(&self) -> CorrelationId {
        self.next.load(Ordering::Relaxed)
    }
}

impl CorrelationIdGenerator for SequentialIds {
    fn generate(&self) -> CorrelationId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_increase_from_zero() {
        let ids = SequentialIds::new();
        let taken: Vec<_> = (0..5).map(|_| ids.generate()).collect();
        assert_eq!(taken, vec![0, 1, 2, 3, 4]);
        assert_eq!(ids.peek(), 5);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let ids = Arc::new(SequentialIds::starting_at(100));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let batch = handle.join().unwrap();
            assert!(batch.windows(2).all(|w| w[0] < w[1]));
            for id in batch {
                assert!(seen.insert(id), "id {} issued twice", id);
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(seen.iter().min(), Some(&100));
    }
}
