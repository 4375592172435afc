mod __test__;

use crate::level::Level;
use crate::timestamp::Timestamp;
use crate::value::JsonValue;
use smallvec::SmallVec;
use std::fmt;

/// An ordered `(name, value)` pair. Stored as a `SmallVec` inline up to four
/// entries — most events carry a handful of properties, so this avoids a
/// heap allocation for the common case, the same trade-off the teacher
/// crate makes for its own per-event field storage.
pub type Properties = SmallVec<[(String, JsonValue); 4]>;

/// An opaque error value carried alongside an event for sink rendering.
///
/// The core does not interpret this beyond `Display`/`Debug` — it exists so
/// `write(level, template, props, exception)` can attach whatever error
/// type the call site already has without the runtime needing to know its
/// shape.
pub trait ExceptionInfo: fmt::Display + fmt::Debug + Send + Sync {}
impl<T: fmt::Display + fmt::Debug + Send + Sync> ExceptionInfo for T {}

/// A single, immutable log event.
///
/// Once constructed an `Event` is never mutated in place; enrichers and the
/// context-merge step each produce a new `Event` rather than editing one,
/// which keeps the dispatch pipeline straightforward to reason about under
/// concurrent calls from multiple threads.
#[derive(Clone)]
pub struct Event {
  pub timestamp: Timestamp,
  pub level: Level,
  pub template: String,
  pub rendered: String,
  pub properties: Properties,
  pub exception_info: Option<std::sync::Arc<dyn ExceptionInfo>>,
  pub correlation_id: Option<String>,
}

impl fmt::Debug for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Event")
      .field("timestamp", &self.timestamp.rfc3339)
      .field("level", &self.level)
      .field("template", &self.template)
      .field("rendered", &self.rendered)
      .field("properties", &self.properties)
      .field("correlation_id", &self.correlation_id)
      .finish()
  }
}

impl Event {
  pub fn new(
    timestamp: Timestamp,
    level: Level,
    template: impl Into<String>,
    rendered: impl Into<String>,
    properties: Properties,
    correlation_id: Option<String>,
  ) -> Event {
    Event {
      timestamp,
      level,
      template: template.into(),
      rendered: rendered.into(),
      properties,
      exception_info: None,
      correlation_id,
    }
  }

  /// First-insertion-wins lookup — duplicate names are permitted in
  /// storage, but a reader always sees the first occurrence.
  pub fn get(&self, name: &str) -> Option<&JsonValue> {
    self.properties.iter().find(|(n, _)| n == name).map(|(_, v)| v)
  }

  /// Returns a new `Event` with `extra` properties prepended, applying
  /// first-insertion-wins only at read time (duplicates remain in
  /// storage). Used by the context-merge step.
  pub fn with_prepended_properties(&self, extra: impl IntoIterator<Item = (String, JsonValue)>) -> Event {
    let mut properties: Properties = extra.into_iter().collect();
    properties.extend(self.properties.iter().cloned());
    Event {
      properties,
      ..self.clone()
    }
  }

  pub fn with_correlation_id(&self, id: Option<String>) -> Event {
    Event {
      correlation_id: id.or_else(|| self.correlation_id.clone()),
      ..self.clone()
    }
  }
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.level, self.rendered)
  }
}

/// A pure function that augments an event with additional properties
/// before filtering.
pub type Enricher = std::sync::Arc<dyn Fn(Event) -> Event + Send + Sync>;
