
use crate::value::JsonValue;
use std::cell::RefCell;

/// Per-thread ambient state: a stack of structured properties and a stack
/// of correlation ids. Both are empty when a thread starts.
#[derive(Default, Clone)]
struct ContextState {
  property_stack: Vec<(String, JsonValue)>,
  correlation_stack: Vec<String>,
}

thread_local! {
  static STATE: RefCell<ContextState> = RefCell::new(ContextState::default());
}

/// A point-in-time copy of one thread's ambient state, for explicit
/// cross-thread propagation (propagation across threads is
/// explicit").
#[derive(Clone, Default)]
pub struct ContextSnapshot {
  property_stack: Vec<(String, JsonValue)>,
  correlation_stack: Vec<String>,
}

pub fn push_property(name: impl Into<String>, value: JsonValue) {
  STATE.with(|s| s.borrow_mut().property_stack.push((name.into(), value)));
}

/// Popping an empty stack is a silent no-op.
pub fn pop_property() {
  STATE.with(|s| {
    s.borrow_mut().property_stack.pop();
  });
}

/// Current ambient properties, top-of-stack entries ordered so that the
/// most recently pushed property appears first — consistent with the
/// merge order used by the logger (ambient properties come before static context
/// properties, which come before the event's own).
pub fn current_properties() -> Vec<(String, JsonValue)> {
  STATE.with(|s| {
    let mut props = s.borrow().property_stack.clone();
    props.reverse();
    props
  })
}

pub fn clear() {
  STATE.with(|s| {
    let mut state = s.borrow_mut();
    state.property_stack.clear();
    state.correlation_stack.clear();
  });
}

pub fn push_correlation_id(id: impl Into<String>) {
  STATE.with(|s| s.borrow_mut().correlation_stack.push(id.into()));
}

pub fn pop_correlation_id() {
  STATE.with(|s| {
    s.borrow_mut().correlation_stack.pop();
  });
}

pub fn get_correlation_id() -> Option<String> {
  STATE.with(|s| s.borrow().correlation_stack.last().cloned())
}

/// Runs `f` with `(name, value)` pushed as an ambient property, popping it
/// afterward even if `f` panics (stack depth is restored on
/// exceptional exit via `catch_unwind` plus a guaranteed pop before
/// re-raising).
pub fn with_property<R>(name: impl Into<String>, value: JsonValue, f: impl FnOnce() -> R) -> R {
  push_property(name, value);
  run_and_pop(f, pop_property)
}

pub fn with_properties<R>(
  props: impl IntoIterator<Item = (String, JsonValue)>,
  f: impl FnOnce() -> R,
) -> R {
  let mut count = 0;
  for (name, value) in props {
    push_property(name, value);
    count += 1;
  }
  run_and_pop(f, move || {
    for _ in 0..count {
      pop_property();
    }
  })
}

pub fn with_correlation_id<R>(id: impl Into<String>, f: impl FnOnce() -> R) -> R {
  push_correlation_id(id);
  run_and_pop(f, pop_correlation_id)
}

/// Same as [`with_correlation_id`] but generates a random id matching the
/// `[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}` pattern
/// (not required to be RFC4122-compliant).
pub fn with_correlation_id_auto<R>(f: impl FnOnce() -> R) -> R {
  with_correlation_id(generate_correlation_id(), f)
}

pub fn generate_correlation_id() -> String {
  let mut bytes = [0u8; 16];
  let mut seed = std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .map(|d| d.as_nanos())
    .unwrap_or(0) as u64;
  // Thread-local counter folded into the seed so two ids generated in the
  // same nanosecond on the same thread still differ.
  seed ^= (thread_salt() as u64).wrapping_mul(0x9E3779B97F4A7C15);
  for b in bytes.iter_mut() {
    seed ^= seed << 13;
    seed ^= seed >> 7;
    seed ^= seed << 17;
    *b = (seed & 0xFF) as u8;
  }
  format!(
    "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
    bytes[0], bytes[1], bytes[2], bytes[3],
    bytes[4], bytes[5],
    bytes[6], bytes[7],
    bytes[8], bytes[9],
    bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
  )
}

fn thread_salt() -> u64 {
  thread_local! {
    static SALT: std::cell::Cell<u64> = std::cell::Cell::new(0);
  }
  SALT.with(|s| {
    let v = s.get().wrapping_add(1);
    s.set(v);
    v ^ (&v as *const u64 as u64)
  })
}

/// Saves both stacks on entry and restores them on exit, regardless of
/// what `f` did to them or whether it panicked.
pub fn with_scope<R>(f: impl FnOnce() -> R) -> R {
  let saved = STATE.with(|s| s.borrow().clone());
  run_and_pop(f, move || {
    STATE.with(|s| *s.borrow_mut() = saved);
  })
}

/// Takes a snapshot of the current thread's ambient state.
pub fn export_context() -> ContextSnapshot {
  STATE.with(|s| {
    let state = s.borrow();
    ContextSnapshot {
      property_stack: state.property_stack.clone(),
      correlation_stack: state.correlation_stack.clone(),
    }
  })
}

/// Temporarily installs `snapshot` as this thread's ambient state for the
/// duration of `f`, restoring whatever was there before on exit.
pub fn import_context<R>(snapshot: &ContextSnapshot, f: impl FnOnce() -> R) -> R {
  let saved = STATE.with(|s| s.borrow().clone());
  STATE.with(|s| {
    *s.borrow_mut() = ContextState {
      property_stack: snapshot.property_stack.clone(),
      correlation_stack: snapshot.correlation_stack.clone(),
    };
  });
  run_and_pop(f, move || {
    STATE.with(|s| *s.borrow_mut() = saved);
  })
}

/// Runs `f`, then runs `cleanup` whether or not `f` panicked, re-raising
/// the panic afterward so the caller still observes it.
fn run_and_pop<R>(f: impl FnOnce() -> R, cleanup: impl FnOnce()) -> R {
  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
  cleanup();
  match result {
    Ok(value) => value,
    Err(payload) => std::panic::resume_unwind(payload),
  }
}
