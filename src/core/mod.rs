//! # Core Infrastructure Module
//!
//! The bookkeeping shared by every worker pool: correlation identifiers that tag
//! each request, and the table of requests still waiting for a reply.

pub mod correlation;
pub mod pending;

pub use correlation::{CorrelationId, CorrelationIdGenerator, SequentialIds};
pub use pending::{InsertError, PendingTable};
