
use std::collections::BTreeMap;
use std::fmt;

/// A structured field value.
///
/// This is the explicit, per-type converter model the runtime standardizes
/// on (see `DESIGN.md` — open question on generic-to-JSON fallback):
/// callers build a `JsonValue` directly rather than handing the logger an
/// arbitrary value for runtime reflection.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  List(Vec<JsonValue>),
  /// Ordered map — insertion order is preserved for CLEF's deterministic
  /// field ordering, so this is a `Vec` of pairs rather than a `BTreeMap`.
  Map(Vec<(String, JsonValue)>),
}

impl JsonValue {
  pub fn string(s: impl Into<String>) -> JsonValue {
    JsonValue::String(s.into())
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      JsonValue::String(s) => Some(s.as_str()),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      JsonValue::Int(i) => Some(*i),
      _ => None,
    }
  }

  /// Canonical short string form used by template rendering:
  /// decimal for ints, default `f64` formatting for floats, `true`/`false`
  /// for bools, `null` for null, `<complex>` for list/map.
  pub fn render_short(&self) -> String {
    match self {
      JsonValue::Null => "null".to_string(),
      JsonValue::Bool(b) => b.to_string(),
      JsonValue::Int(i) => i.to_string(),
      JsonValue::Float(f) => format_float_default(*f),
      JsonValue::String(s) => s.clone(),
      JsonValue::List(_) | JsonValue::Map(_) => "<complex>".to_string(),
    }
  }
}

/// Default `f64` rendering: round-trippable, without scientific notation
/// for the common case, matching what `{:?}` would print for most values
/// but without the `f64`-suffix ambiguity `{:?}` has for integral floats.
pub(crate) fn format_float_default(f: f64) -> String {
  if f.is_nan() {
    return "NaN".to_string();
  }
  if f.is_infinite() {
    return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
  }
  let mut s = format!("{}", f);
  if !s.contains('.') && !s.contains('e') && !s.contains('E') {
    s.push_str(".0");
  }
  s
}

impl fmt::Display for JsonValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render_short())
  }
}

impl From<bool> for JsonValue {
  fn from(v: bool) -> Self {
    JsonValue::Bool(v)
  }
}

impl From<i64> for JsonValue {
  fn from(v: i64) -> Self {
    JsonValue::Int(v)
  }
}

impl From<f64> for JsonValue {
  fn from(v: f64) -> Self {
    JsonValue::Float(v)
  }
}

impl From<&str> for JsonValue {
  fn from(v: &str) -> Self {
    JsonValue::String(v.to_string())
  }
}

impl From<String> for JsonValue {
  fn from(v: String) -> Self {
    JsonValue::String(v)
  }
}

/// Convert a `JsonValue::Map` into a `BTreeMap` for callers that want a
/// stable-keyed lookup rather than the insertion-ordered `Vec` form.
pub fn to_sorted_map(value: &JsonValue) -> Option<BTreeMap<String, JsonValue>> {
  match value {
    JsonValue::Map(pairs) => Some(pairs.iter().cloned().collect()),
    _ => None,
  }
}
