mod __test__;

use crate::error::SinkError;
use crate::event::Event;
use crate::level::Level;
use crate::sink::Sink;
use std::io::{self, Write};
use std::sync::Mutex;

const RESET: &str = "\x1b[0m";
const DARK_GREY: &str = "\x1b[90m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";

fn color_for(level: Level) -> &'static str {
  match level {
    Level::Verbose => DARK_GREY,
    Level::Debug => CYAN,
    Level::Information => GREEN,
    Level::Warning => YELLOW,
    Level::Error => RED,
    Level::Fatal => MAGENTA,
  }
}

/// Writes one line per event to stdout or stderr depending on
/// `stderr_threshold`, rendered through a fixed micro-template of
/// `{timestamp}`, `{level}`, `{message}` tokens.
pub struct ConsoleSink {
  template: String,
  colored: bool,
  stderr_threshold: Level,
  buffer: Mutex<String>,
}

pub const DEFAULT_TEMPLATE: &str = "{timestamp} [{level}] {message}";

impl ConsoleSink {
  pub fn new() -> Self {
    Self {
      template: DEFAULT_TEMPLATE.to_string(),
      colored: true,
      stderr_threshold: Level::Warning,
      buffer: Mutex::new(String::with_capacity(256)),
    }
  }

  pub fn with_template(mut self, template: impl Into<String>) -> Self {
    self.template = template.into();
    self
  }

  pub fn with_colors(mut self, colored: bool) -> Self {
    self.colored = colored;
    self
  }

  pub fn with_stderr_threshold(mut self, threshold: Level) -> Self {
    self.stderr_threshold = threshold;
    self
  }

  fn render(&self, event: &Event) -> String {
    let level_token = if self.colored {
      format!("{}{}{}", color_for(event.level), event.level.full_name(), RESET)
    } else {
      event.level.full_name().to_string()
    };

    let mut out = String::with_capacity(self.template.len() + event.rendered.len() + 32);
    let bytes = self.template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
      if bytes[i] == b'{' {
        if self.template[i..].starts_with("{timestamp}") {
          out.push_str(&event.timestamp.rfc3339);
          i += "{timestamp}".len();
          continue;
        }
        if self.template[i..].starts_with("{level}") {
          out.push_str(&level_token);
          i += "{level}".len();
          continue;
        }
        if self.template[i..].starts_with("{message}") {
          out.push_str(&event.rendered);
          i += "{message}".len();
          continue;
        }
      }
      let ch_len = char_len(bytes[i]);
      out.push_str(&self.template[i..i + ch_len]);
      i += ch_len;
    }
    out
  }
}

fn char_len(lead_byte: u8) -> usize {
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

impl Default for ConsoleSink {
  fn default() -> Self {
    Self::new()
  }
}

impl Sink for ConsoleSink {
  fn emit(&self, event: &Event) -> Result<(), SinkError> {
    let mut buf = self.buffer.lock().map_err(|_| SinkError::Other("console buffer poisoned".into()))?;
    buf.clear();
    buf.push_str(&self.render(event));
    buf.push('\n');

    if event.level >= self.stderr_threshold {
      io::stderr().write_all(buf.as_bytes())?;
      io::stderr().flush()?;
    } else {
      io::stdout().write_all(buf.as_bytes())?;
      io::stdout().flush()?;
    }
    Ok(())
  }
}
