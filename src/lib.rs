//! A structured logging runtime: named-placeholder message templates,
//! CLEF-convention JSON output, ambient request context, per-sink level
//! filtering, non-blocking asynchronous delivery, and circuit-breaker-backed
//! failure isolation.
//!
//! The entry point for most callers is [`logger::Logger`]. Everything else in
//! this crate is a building block it composes: [`event::Event`] is the
//! immutable record a call site produces, [`sink`] defines where events go,
//! [`queue::AsyncQueue`] decouples slow sinks from call sites, and
//! [`context`] carries ambient, thread-scoped properties into every event
//! without the caller threading them through explicitly.

pub mod circuit_breaker;
pub mod clef;
pub mod context;
pub mod error;
pub mod event;
pub mod filter;
pub mod level;
pub mod logger;
pub mod memory;
pub mod metrics;
pub mod queue;
pub mod shutdown;
pub mod sink;
pub mod template;
pub mod timestamp;
pub mod value;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use error::LogError;
pub use event::Event;
pub use level::Level;
pub use logger::{Logger, LoggerConfig};
pub use value::JsonValue;
