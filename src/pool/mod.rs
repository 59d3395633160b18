//! # Worker Pool Module
//!
//! A fixed set of background worker threads that all run the same [`Job`].
//! Requests are dispatched round-robin and matched to their replies by
//! correlation id.
//!
//! ```text
//!  submit(data) ──id──▶ PendingTable ◀──take(id)── listener-0 ◀── worker-0
//!        │                                          listener-1 ◀── worker-1
//!        └────────── round-robin request ───────▶   worker-(next % K)
//! ```
//!
//! Each worker has its own request channel and a dedicated listener thread
//! that resolves tickets from the worker's replies.

pub mod job;
pub mod jobs;
pub mod manager;
pub mod message;
mod worker;

pub use job::Job;
pub use jobs::{CompressPool, DeflateJob, ImageJob, ImagePool, ImageTask};
pub use manager::{Ticket, WorkerPool};
pub use message::{Completion, Reply, Request};
