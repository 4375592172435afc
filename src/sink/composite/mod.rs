mod __test__;

use crate::error::SinkError;
use crate::event::Event;
use crate::sink::{Sink, SinkEntry};

/// Fans an event out to an ordered list of sinks, each with its own
/// optional minimum level. `emit` skips an entry whose minimum exceeds
/// the event's level; `flush`/`close` run against every entry
/// regardless, in declaration order.
pub struct CompositeSink {
  entries: Vec<SinkEntry>,
}

impl CompositeSink {
  pub fn new(entries: Vec<SinkEntry>) -> Self {
    Self { entries }
  }
}

impl Sink for CompositeSink {
  fn emit(&self, event: &Event) -> Result<(), SinkError> {
    let mut first_err = None;
    for entry in &self.entries {
      if !entry.accepts(event.level) {
        continue;
      }
      if let Err(err) = entry.sink.emit(event) {
        if first_err.is_none() {
          first_err = Some(err);
        }
      }
    }
    match first_err {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  fn flush(&self) -> Result<(), SinkError> {
    let mut first_err = None;
    for entry in &self.entries {
      if let Err(err) = entry.sink.flush() {
        if first_err.is_none() {
          first_err = Some(err);
        }
      }
    }
    match first_err {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  fn close(&self) -> Result<(), SinkError> {
    let mut first_err = None;
    for entry in &self.entries {
      if let Err(err) = entry.sink.close() {
        if first_err.is_none() {
          first_err = Some(err);
        }
      }
    }
    match first_err {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}
