use std::sync::Arc;
use thiserror::Error;

/// Raised synchronously from construction/configuration calls.
///
/// Nothing in the dispatch hot path (`Logger::write`) returns or raises
/// this — internal failures there are swallowed into metrics and the
/// configured error handler instead.
#[derive(Debug, Error)]
pub enum LogError {
  #[error("{field} must be positive, got {value}")]
  InvalidThreshold { field: &'static str, value: i64 },

  #[error("event of {size} bytes exceeds the {max}-byte limit")]
  EventTooLarge { size: usize, max: usize },

  #[error("shutdown has already been executed")]
  AlreadyShutdown,

  #[error("unrecognized log level: {0:?}")]
  UnknownLevel(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Error surface for an individual [`crate::sink::Sink`] operation.
///
/// Kept distinct from [`LogError`] because sink failures are a routine,
/// per-event occurrence the dispatch layer catches and counts rather than a
/// configuration mistake.
#[derive(Debug, Error)]
pub enum SinkError {
  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("{0}")]
  Other(String),
}

/// Writes `err` to stderr with the runtime's own `[logrt]` prefix. Used
/// as the default for any callback slot (async queue error handler,
/// sink construction failures surfaced before a logger exists) the
/// caller hasn't overridden.
pub fn default_error_handler(err: &dyn std::error::Error) {
  eprintln!("[logrt] {}", err);
}

/// A callback notified of a [`SinkError`] that the caller's code did not
/// raise synchronously — a sink `emit` failure routed through the logger's
/// dispatch loop, or an async queue flush failure. Shared between
/// [`crate::logger::Logger`] and [`crate::queue::AsyncQueue`] so both can
/// take the same kind of handler.
pub type ErrorHandler = Arc<dyn Fn(&SinkError) + Send + Sync>;

/// An [`ErrorHandler`] that forwards to [`default_error_handler`].
pub fn default_error_handler_arc() -> ErrorHandler {
  Arc::new(|err: &SinkError| default_error_handler(err))
}
