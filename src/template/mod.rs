
use crate::event::Properties;

/// Substitutes each `{name}` hole in `template` with the matching
/// property's canonical short string form.
///
/// - `{{` and `}}` are literal braces.
/// - Properties without a matching placeholder are simply not substituted
///   (they still end up as structured fields on the event — that's the
///   caller's job, not this function's).
/// - Placeholders without a matching property are left verbatim, braces
///   and all.
/// - A name that appears more than once in the template is substituted at
///   every occurrence.
///
/// Pure and deterministic: this never looks at ambient context.
pub fn render(template: &str, properties: &Properties) -> String {
  let mut out = String::with_capacity(template.len());
  let bytes = template.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    match bytes[i] {
      b'{' if bytes.get(i + 1) == Some(&b'{') => {
        out.push('{');
        i += 2;
      },
      b'}' if bytes.get(i + 1) == Some(&b'}') => {
        out.push('}');
        i += 2;
      },
      b'{' => {
        if let Some(close) = find_close(bytes, i + 1) {
          let name = &template[i + 1..close];
          match lookup(properties, name) {
            Some(value) => out.push_str(&value.render_short()),
            None => {
              out.push('{');
              out.push_str(name);
              out.push('}');
            },
          }
          i = close + 1;
        } else {
          // Unterminated hole: pass the brace through literally.
          out.push('{');
          i += 1;
        }
      },
      _ => {
        // Advance by the full UTF-8 char to stay byte-safe.
        let ch_len = utf8_char_len(bytes[i]);
        out.push_str(&template[i..i + ch_len]);
        i += ch_len;
      },
    }
  }

  out
}

fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
  bytes[from..].iter().position(|&b| b == b'}').map(|p| from + p)
}

fn lookup<'a>(properties: &'a Properties, name: &str) -> Option<&'a crate::value::JsonValue> {
  properties.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

fn utf8_char_len(lead_byte: u8) -> usize {
  if lead_byte & 0x80 == 0 {
    1
  } else if lead_byte & 0xE0 == 0xC0 {
    2
  } else if lead_byte & 0xF0 == 0xE0 {
    3
  } else {
    4
  }
}
