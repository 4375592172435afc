
use crate::event::Event;
use crate::level::Level;
use crate::value::JsonValue;
use std::sync::Arc;

/// A predicate over an [`Event`]. Boxed as an `Arc<dyn Fn>` so
/// filters can be cheaply cloned into sub-loggers (`Logger::add_filter`
/// prepends without taking ownership of the parent's list).
pub type Filter = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Passes iff the event's level is at least `min`.
pub fn level_filter(min: Level) -> Filter {
  Arc::new(move |event: &Event| event.level >= min)
}

/// Passes iff `name` is present on the event and `predicate` holds for its
/// value.
pub fn property_filter(
  name: impl Into<String>,
  predicate: impl Fn(&JsonValue) -> bool + Send + Sync + 'static,
) -> Filter {
  let name = name.into();
  Arc::new(move |event: &Event| event.get(&name).map(&predicate).unwrap_or(false))
}

/// Passes iff `name` is present on the event, regardless of its value.
pub fn matching(name: impl Into<String>) -> Filter {
  let name = name.into();
  Arc::new(move |event: &Event| event.get(&name).is_some())
}

/// Passes iff every filter in `filters` passes. `all(&[])` is
/// [`always_pass`].
pub fn all(filters: Vec<Filter>) -> Filter {
  Arc::new(move |event: &Event| filters.iter().all(|f| f(event)))
}

/// Passes iff at least one filter in `filters` passes. `any(&[])` is
/// [`always_block`].
pub fn any(filters: Vec<Filter>) -> Filter {
  Arc::new(move |event: &Event| filters.iter().any(|f| f(event)))
}

/// Inverts `f`. `not(not(f))` is equivalent to `f` on every event.
pub fn not(f: Filter) -> Filter {
  Arc::new(move |event: &Event| !f(event))
}

pub fn always_pass() -> Filter {
  Arc::new(|_event: &Event| true)
}

pub fn always_block() -> Filter {
  Arc::new(|_event: &Event| false)
}
