
use crate::error::SinkError;
use crate::event::Event;
use crate::sink::Sink;

/// Discards every event. Useful as a default sink in tests and as a
/// placeholder while wiring up a [`crate::logger::Logger`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
  fn emit(&self, _event: &Event) -> Result<(), SinkError> {
    Ok(())
  }
}
