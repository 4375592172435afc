pub mod composite;
pub mod console;
pub mod file;
pub mod json;
pub mod null;

use crate::error::SinkError;
use crate::event::Event;
use crate::level::Level;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Where events go once a [`crate::logger::Logger`] decides to deliver
/// them. No error return means "cannot fail"; everything that touches an
/// OS resource returns `Result` so the dispatch layer can route failures
/// to metrics and an error handler instead of panicking.
pub trait Sink: Send + Sync {
  fn emit(&self, event: &Event) -> Result<(), SinkError>;

  fn flush(&self) -> Result<(), SinkError> {
    Ok(())
  }

  fn close(&self) -> Result<(), SinkError> {
    Ok(())
  }
}

fn next_anonymous_id() -> String {
  static COUNTER: AtomicU64 = AtomicU64::new(0);
  format!("sink-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// A sink paired with the minimum level it accepts and the id the
/// metrics store tracks it under. `min_level = None` means every event
/// reaching the sink in dispatch order is accepted, deferring entirely to
/// the logger's own threshold. `id` defaults to an anonymous
/// `sink-<n>` counter if not given a name via [`SinkEntry::named`].
#[derive(Clone)]
pub struct SinkEntry {
  pub sink: Arc<dyn Sink>,
  pub min_level: Option<Level>,
  pub id: String,
}

impl SinkEntry {
  pub fn new(sink: Arc<dyn Sink>) -> Self {
    Self { sink, min_level: None, id: next_anonymous_id() }
  }

  pub fn with_min_level(sink: Arc<dyn Sink>, min_level: Level) -> Self {
    Self { sink, min_level: Some(min_level), id: next_anonymous_id() }
  }

  pub fn named(id: impl Into<String>, sink: Arc<dyn Sink>) -> Self {
    Self { sink, min_level: None, id: id.into() }
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = id.into();
    self
  }

  pub fn with_level(mut self, min_level: Level) -> Self {
    self.min_level = Some(min_level);
    self
  }

  pub fn accepts(&self, level: Level) -> bool {
    self.min_level.map(|min| level >= min).unwrap_or(true)
  }
}
