#[cfg(test)]
mod __test__ {
  use crate::context;
  use crate::error::SinkError;
  use crate::event::Event;
  use crate::level::Level;
  use crate::logger::{Logger, LoggerConfig};
  use crate::sink::{Sink, SinkEntry};
  use crate::value::JsonValue;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::{Arc, Mutex};

  struct RecordingSink {
    events: Mutex<Vec<Event>>,
    touches: AtomicUsize,
  }

  impl RecordingSink {
    fn new() -> Self {
      Self { events: Mutex::new(Vec::new()), touches: AtomicUsize::new(0) }
    }
  }

  impl Sink for RecordingSink {
    fn emit(&self, event: &Event) -> Result<(), SinkError> {
      self.touches.fetch_add(1, Ordering::SeqCst);
      self.events.lock().unwrap().push(event.clone());
      Ok(())
    }
  }

  fn logger_with(sink: Arc<RecordingSink>, min_level: Level) -> Logger {
    Logger::new(LoggerConfig::new(min_level), vec![SinkEntry::new(sink)])
  }

  #[test]
  fn scenario_a_fast_path_never_touches_sinks_below_min_level() {
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Warning);

    logger.information("ignored {x}", smallvec::smallvec![("x".to_string(), JsonValue::Int(1))]);

    assert_eq!(sink.touches.load(Ordering::SeqCst), 0);
    assert_eq!(sink.events.lock().unwrap().len(), 0);
  }

  #[test]
  fn at_or_above_min_level_reaches_the_sink() {
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Warning);

    logger.error("failure {code}", smallvec::smallvec![("code".to_string(), JsonValue::Int(500))], None);

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].rendered, "failure 500");
  }

  #[test]
  fn scenario_b_context_properties_are_merged_ahead_of_event_properties() {
    context::clear();
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Verbose);

    context::with_property("request_id", JsonValue::string("r-1"), || {
      logger.information("hello {request_id}", smallvec::smallvec![("request_id".to_string(), JsonValue::string("event-value"))]);
    });

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    // Rendering happens before the merge step, so the template substitution
    // still uses the event-local property...
    assert_eq!(events[0].rendered, "hello event-value");
    // ...but the merged property list exposes the ambient value first.
    assert_eq!(events[0].get("request_id"), Some(&JsonValue::string("r-1")));
  }

  #[test]
  fn ambient_correlation_id_is_attached_to_the_event() {
    context::clear();
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Verbose);

    context::with_correlation_id("corr-xyz", || {
      logger.information("ping", smallvec::smallvec![]);
    });

    let events = sink.events.lock().unwrap();
    assert_eq!(events[0].correlation_id.as_deref(), Some("corr-xyz"));
  }

  #[test]
  fn a_false_filter_drops_the_event_before_any_sink_runs() {
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Verbose).add_filter(crate::filter::always_block());

    logger.information("never seen", smallvec::smallvec![]);
    assert_eq!(sink.touches.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn a_false_filter_records_a_drop_for_every_sink_it_would_have_reached() {
    let reachable = Arc::new(RecordingSink::new());
    let unreachable = Arc::new(RecordingSink::new());
    let logger = Logger::new(
      LoggerConfig::new(Level::Verbose),
      vec![
        SinkEntry::named("reachable", reachable.clone()),
        SinkEntry::named("unreachable", unreachable.clone()).with_level(Level::Fatal),
      ],
    )
    .add_filter(crate::filter::always_block());

    logger.information("never seen", smallvec::smallvec![]);

    assert_eq!(reachable.touches.load(Ordering::SeqCst), 0);
    assert_eq!(unreachable.touches.load(Ordering::SeqCst), 0);

    let json = logger.metrics().to_json("2026-01-01T00:00:00.000Z");
    let sinks = match json {
      JsonValue::Map(fields) => fields.into_iter().find(|(k, _)| k == "sinks").unwrap().1,
      _ => panic!("expected map"),
    };
    let entries = match sinks {
      JsonValue::List(entries) => entries,
      _ => panic!("expected list"),
    };

    let dropped_count_for = |id: &str| -> i64 {
      let entry = entries
        .iter()
        .find(|entry| matches!(entry, JsonValue::Map(fields) if fields.iter().any(|(k, v)| k == "sink" && v.as_str() == Some(id))))
        .expect("sink recorded in metrics");
      match entry {
        JsonValue::Map(fields) => match fields.iter().find(|(k, _)| k == "events_dropped").unwrap().1 {
          JsonValue::Int(n) => n,
          _ => panic!("expected int"),
        },
        _ => panic!("expected map"),
      }
    };

    // "reachable" accepts Information (no per-sink minimum) and so would
    // have received this event had the filter not rejected it first.
    assert_eq!(dropped_count_for("reachable"), 1);
    // "unreachable" requires Fatal; this Information-level event would
    // never have reached it regardless of the filter, so it's never even
    // recorded in metrics.
    assert!(entries
      .iter()
      .all(|entry| !matches!(entry, JsonValue::Map(fields) if fields.iter().any(|(k, v)| k == "sink" && v.as_str() == Some("unreachable")))));
  }

  #[test]
  fn for_context_prepends_static_properties_to_every_event() {
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Verbose)
      .for_context(vec![("service".to_string(), JsonValue::string("billing"))]);

    logger.information("started", smallvec::smallvec![]);
    let events = sink.events.lock().unwrap();
    assert_eq!(events[0].get("service"), Some(&JsonValue::string("billing")));
  }

  struct FailingSink;

  impl Sink for FailingSink {
    fn emit(&self, _event: &Event) -> Result<(), SinkError> {
      Err(SinkError::Other("boom".to_string()))
    }
  }

  #[test]
  fn sink_failures_are_routed_to_metrics_and_the_error_handler_not_raised() {
    let entry = SinkEntry::named("broken", Arc::new(FailingSink));
    let logger = Logger::new(LoggerConfig::new(Level::Verbose), vec![entry]);

    let notified = Arc::new(AtomicUsize::new(0));
    let notified_clone = notified.clone();
    let logger = logger.with_error_handler(Arc::new(move |_err| {
      notified_clone.fetch_add(1, Ordering::SeqCst);
    }));

    logger.information("will fail", smallvec::smallvec![]);

    assert_eq!(notified.load(Ordering::SeqCst), 1);
    assert_eq!(logger.metrics().latency_p50_us("broken"), None);

    let json = logger.metrics().to_json("2026-01-01T00:00:00.000Z");
    let sinks = match json {
      JsonValue::Map(fields) => fields.into_iter().find(|(k, _)| k == "sinks").unwrap().1,
      _ => panic!("expected map"),
    };
    let entries = match sinks {
      JsonValue::List(entries) => entries,
      _ => panic!("expected list"),
    };
    let broken = entries
      .into_iter()
      .find(|entry| matches!(entry, JsonValue::Map(fields) if fields.iter().any(|(k, v)| k == "sink" && v.as_str() == Some("broken"))))
      .expect("broken sink recorded in metrics");
    let events_failed = match broken {
      JsonValue::Map(fields) => fields.into_iter().find(|(k, _)| k == "events_failed").unwrap().1,
      _ => panic!("expected map"),
    };
    assert_eq!(events_failed, JsonValue::Int(1));
  }

  #[test]
  fn successful_emits_are_timed_into_per_sink_metrics() {
    let sink = Arc::new(RecordingSink::new());
    let entry = SinkEntry::named("recorder", sink);
    let logger = Logger::new(LoggerConfig::new(Level::Verbose), vec![entry]);

    logger.information("ok", smallvec::smallvec![]);
    logger.information("ok again", smallvec::smallvec![]);

    assert!(logger.metrics().latency_p50_us("recorder").is_some());
  }

  #[test]
  fn derived_loggers_share_the_same_sinks() {
    let sink = Arc::new(RecordingSink::new());
    let logger = logger_with(sink.clone(), Level::Verbose);
    let derived = logger.for_source("billing-service").with_enricher(Arc::new(|event| event));

    logger.information("a", smallvec::smallvec![]);
    derived.information("b", smallvec::smallvec![]);

    assert_eq!(sink.touches.load(Ordering::SeqCst), 2);
  }
}
