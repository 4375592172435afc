#[cfg(test)]
mod __test__ {
  use crate::error::SinkError;
  use crate::event::Event;
  use crate::level::Level;
  use crate::sink::composite::CompositeSink;
  use crate::sink::{Sink, SinkEntry};
  use crate::timestamp::now;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  struct CountingSink {
    count: AtomicUsize,
  }

  impl Sink for CountingSink {
    fn emit(&self, _event: &Event) -> Result<(), SinkError> {
      self.count.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }

  struct FailingSink;

  impl Sink for FailingSink {
    fn emit(&self, _event: &Event) -> Result<(), SinkError> {
      Err(SinkError::Other("boom".to_string()))
    }
  }

  fn event_at(level: Level) -> Event {
    Event::new(now(), level, "t", "t", smallvec::smallvec![], None)
  }

  #[test]
  fn skips_entries_below_their_min_level() {
    let low = Arc::new(CountingSink { count: AtomicUsize::new(0) });
    let high = Arc::new(CountingSink { count: AtomicUsize::new(0) });
    let composite = CompositeSink::new(vec![
      SinkEntry::new(low.clone()),
      SinkEntry::with_min_level(high.clone(), Level::Error),
    ]);

    composite.emit(&event_at(Level::Information)).unwrap();
    assert_eq!(low.count.load(Ordering::SeqCst), 1);
    assert_eq!(high.count.load(Ordering::SeqCst), 0);

    composite.emit(&event_at(Level::Error)).unwrap();
    assert_eq!(low.count.load(Ordering::SeqCst), 2);
    assert_eq!(high.count.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn one_failing_sink_does_not_block_the_others() {
    let after = Arc::new(CountingSink { count: AtomicUsize::new(0) });
    let composite = CompositeSink::new(vec![
      SinkEntry::new(Arc::new(FailingSink)),
      SinkEntry::new(after.clone()),
    ]);

    let result = composite.emit(&event_at(Level::Information));
    assert!(result.is_err());
    assert_eq!(after.count.load(Ordering::SeqCst), 1);
  }
}
