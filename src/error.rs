//! # Error Handling
//!
//! One error type for the whole harness, with rich context attached to every
//! variant.
//!
//! ## Error Taxonomy
//!
//! - **Load**: an image could not be fetched, read or decoded
//! - **Image / Codec**: the image library or the DEFLATE codec failed
//! - **Worker**: a worker caught a failure (error or panic) and reported it
//!   back for a specific request
//! - **PoolDestroyed**: the pool was torn down before the request completed
//! - **Channel**: a worker's channel closed unexpectedly
//!
//! Nothing is retried. Every failure is propagated to the caller that submitted
//! the work; no request is ever left unresolved.
//!
//! ## Usage
//!
//! ```rust
//! use offload_bench::error::{BenchError, HasRecoverySuggestion};
//!
//! let error = BenchError::config("workers", "0", "must be at least 1")
//!     .with_context("building the deflate pool")
//!     .with_recovery_suggestion("pass --workers 1 or more");
//!
//! assert_eq!(error.category(), "config");
//! assert_eq!(error.recovery_suggestion(), Some("pass --workers 1 or more"));
//! ```

use std::{error::Error as StdError, fmt};

use crate::core::CorrelationId;

/// Extra detail attached to an error after it was created
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// What the error refers to, e.g. the file being processed
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }
}

/// Base error type for the benchmark harness
#[derive(Debug)]
pub enum BenchError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// An image could not be obtained (network, file system, decode)
    ImageLoad {
        source_name: String,
        reason: String,
        context: ErrorContext,
    },
    /// Image library failures while compressing
    Image {
        operation: String,
        source: img_squeeze::SqueezeError,
        context: ErrorContext,
    },
    /// DEFLATE codec failures
    Codec {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// A worker reported a failure for one request
    Worker {
        worker: usize,
        id: CorrelationId,
        message: String,
        context: ErrorContext,
    },
    /// The pool was destroyed while the request was outstanding
    PoolDestroyed {
        id: Option<CorrelationId>,
        context: ErrorContext,
    },
    /// A worker or reply channel closed unexpectedly
    Channel {
        worker: usize,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Network errors
    Network {
        url: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
}

impl BenchError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an image load error
    pub fn image_load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            source_name: source_name.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Wrap an image library error
    pub fn image(operation: impl Into<String>, source: img_squeeze::SqueezeError) -> Self {
        Self::Image {
            operation: operation.into(),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a codec error
    pub fn codec(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Codec {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a worker failure for request `id`
    pub fn worker(worker: usize, id: CorrelationId, message: impl Into<String>) -> Self {
        Self::Worker {
            worker,
            id,
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a pool-destroyed error, optionally naming the abandoned request
    pub fn pool_destroyed(id: Option<CorrelationId>) -> Self {
        Self::PoolDestroyed {
            id,
            context: ErrorContext::new(),
        }
    }

    /// Create a channel error
    pub fn channel(worker: usize, reason: impl Into<String>) -> Self {
        Self::Channel {
            worker,
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Attach the path an I/O error refers to
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Create a network error
    pub fn network(url: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Network {
            url: url.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::ImageLoad { context, .. } => context,
            Self::Image { context, .. } => context,
            Self::Codec { context, .. } => context,
            Self::Worker { context, .. } => context,
            Self::PoolDestroyed { context, .. } => context,
            Self::Channel { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Network { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::ImageLoad { context, .. } => context,
            Self::Image { context, .. } => context,
            Self::Codec { context, .. } => context,
            Self::Worker { context, .. } => context,
            Self::PoolDestroyed { context, .. } => context,
            Self::Channel { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Network { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::ImageLoad { .. } => "image_load",
            Self::Image { .. } => "image",
            Self::Codec { .. } => "codec",
            Self::Worker { .. } => "worker",
            Self::PoolDestroyed { .. } => "pool_destroyed",
            Self::Channel { .. } => "channel",
            Self::Io { .. } => "io",
            Self::Network { .. } => "network",
        }
    }

    /// Correlation id of the request this error belongs to, if any
    pub fn correlation_id(&self) -> Option<CorrelationId> {
        match self {
            Self::Worker { id, .. } => Some(*id),
            Self::PoolDestroyed { id, .. } => *id,
            _ => None,
        }
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_message(f)?;

        let context = self.context();
        if let Some(detail) = &context.context {
            write!(f, " ({})", detail)?;
        }
        if let Some(suggestion) = &context.recovery_suggestion {
            write!(f, "; {}", suggestion)?;
        }
        Ok(())
    }
}

impl BenchError {
    fn write_message(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            BenchError::ImageLoad {
                source_name,
                reason,
                ..
            } => {
                write!(f, "Failed to load image from {}: {}", source_name, reason)
            }
            BenchError::Image {
                operation, source, ..
            } => {
                write!(f, "Image processing failed during {}: {}", operation, source)
            }
            BenchError::Codec {
                operation, reason, ..
            } => {
                write!(f, "Codec failed during {}: {}", operation, reason)
            }
            BenchError::Worker {
                worker,
                id,
                message,
                ..
            } => {
                write!(f, "Worker {} failed request {}: {}", worker, id, message)
            }
            BenchError::PoolDestroyed { id, .. } => match id {
                Some(id) => write!(f, "Worker pool destroyed before request {} completed", id),
                None => write!(f, "Worker pool has been destroyed"),
            },
            BenchError::Channel { worker, reason, .. } => {
                write!(f, "Channel to worker {} failed: {}", worker, reason)
            }
            BenchError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            BenchError::Network { url, source, .. } => {
                if let Some(source) = source {
                    write!(f, "Network error fetching {}: {}", url, source)
                } else {
                    write!(f, "Network error fetching {}", url)
                }
            }
        }
    }
}

impl StdError for BenchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Image { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Network {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for BenchError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

impl From<std::io::Error> for BenchError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<img_squeeze::SqueezeError> for BenchError {
    fn from(error: img_squeeze::SqueezeError) -> Self {
        Self::image("compress", error)
    }
}

/// Result alias used throughout the crate
pub type BenchResult<T> = std::result::Result<T, BenchError>;
