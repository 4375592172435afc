
use crate::event::Event;
use crate::value::{format_float_default, JsonValue};

/// Appends one CLEF record for `event` to `out`, *without* a
/// trailing newline — callers (the JSON sink, the file sink's structured
/// suffix) decide line termination themselves.
///
/// Writes directly to the byte buffer rather than building an
/// intermediate tree: the format is fixed and small, so a streaming writer
/// is both faster and simpler to audit for escaping correctness.
pub fn write_clef(out: &mut String, event: &Event) {
  out.push('{');

  write_key(out, "@t");
  write_json_string(out, &event.timestamp.rfc3339);
  out.push(',');

  write_key(out, "@mt");
  write_json_string(out, &event.template);
  out.push(',');

  write_key(out, "@l");
  write_json_string(out, event.level.full_name());
  out.push(',');

  write_key(out, "@m");
  write_json_string(out, &event.rendered);

  if let Some(correlation_id) = &event.correlation_id {
    out.push(',');
    write_key(out, "CorrelationId");
    write_json_string(out, correlation_id);
  }

  for (name, value) in event.properties.iter() {
    out.push(',');
    write_key(out, name);
    write_json_value(out, value);
  }

  out.push('}');
}

/// Writes a bare JSON object of `properties`, with no event envelope.
/// Used by the file sink's structured suffix, which prepends a plain-text
/// prefix rather than a full CLEF record.
pub(crate) fn write_properties_object(out: &mut String, properties: &crate::event::Properties) {
  out.push('{');
  for (idx, (name, value)) in properties.iter().enumerate() {
    if idx > 0 {
      out.push(',');
    }
    write_key(out, name);
    write_json_value(out, value);
  }
  out.push('}');
}

fn write_key(out: &mut String, key: &str) {
  write_json_string(out, key);
  out.push(':');
}

fn write_json_value(out: &mut String, value: &JsonValue) {
  match value {
    JsonValue::Null => out.push_str("null"),
    JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
    JsonValue::Int(i) => {
      if is_json_safe_integer(*i) {
        out.push_str(&i.to_string());
      } else {
        // Exceeds the JSON safe-integer range: emit as a numeric-literal
        // string a JSON-number-reading parser still accepts.
        write_json_string(out, &i.to_string());
      }
    },
    JsonValue::Float(f) => {
      if f.is_finite() {
        out.push_str(&format_float_default(*f));
      } else {
        // NaN/Infinity/-Infinity aren't valid JSON number literals; quote
        // them the same way an out-of-range integer is quoted above, so
        // the line still parses with a standard JSON parser.
        write_json_string(out, &format_float_default(*f));
      }
    },
    JsonValue::String(s) => write_json_string(out, s),
    JsonValue::List(items) => {
      out.push('[');
      for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
          out.push(',');
        }
        write_json_value(out, item);
      }
      out.push(']');
    },
    JsonValue::Map(pairs) => {
      out.push('{');
      for (idx, (key, value)) in pairs.iter().enumerate() {
        if idx > 0 {
          out.push(',');
        }
        write_key(out, key);
        write_json_value(out, value);
      }
      out.push('}');
    },
  }
}

/// `2^53 - 1` — the largest integer a IEEE-754 double (and therefore most
/// JSON number parsers) can represent exactly.
const JSON_MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

fn is_json_safe_integer(i: i64) -> bool {
  (-JSON_MAX_SAFE_INT..=JSON_MAX_SAFE_INT).contains(&i)
}

/// Writes a JSON string literal, including the surrounding quotes.
///
/// Short escapes for `" \ \b \f \n \r \t`; `\uXXXX` for any other byte
/// below `0x20`; every other byte passes through verbatim, so the writer
/// is UTF-8-transparent.
fn write_json_string(out: &mut String, s: &str) {
  out.push('"');
  for ch in s.chars() {
    match ch {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\u{8}' => out.push_str("\\b"),
      '\u{c}' => out.push_str("\\f"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c if (c as u32) < 0x20 => {
        out.push_str(&format!("\\u{:04x}", c as u32));
      },
      c => out.push(c),
    }
  }
  out.push('"');
}
