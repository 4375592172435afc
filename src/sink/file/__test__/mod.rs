#[cfg(test)]
mod __test__ {
  use crate::event::Event;
  use crate::level::Level;
  use crate::sink::file::{FileSink, RollPeriod};
  use crate::sink::Sink;
  use crate::timestamp::now;
  use crate::value::JsonValue;
  use std::io::Read;

  fn sample_event() -> Event {
    Event::new(
      now(),
      Level::Information,
      "t",
      "hello",
      smallvec::smallvec![("k".to_string(), JsonValue::Int(1))],
      None,
    )
  }

  #[test]
  fn infinite_period_writes_to_exact_base_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let sink = FileSink::new(&path, RollPeriod::Infinite).unwrap();
    sink.emit(&sample_event()).unwrap();
    sink.flush().unwrap();

    assert!(path.exists());
    let mut contents = String::new();
    std::fs::File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
    assert!(contents.contains("hello"));
    assert!(contents.contains("\"k\":1"));
    assert!(contents.ends_with('\n'));
  }

  #[test]
  fn daily_rolled_file_has_date_suffix_before_extension() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("app.log");
    let sink = FileSink::new(&base, RollPeriod::Daily).unwrap();
    sink.emit(&sample_event()).unwrap();

    let today = chrono::Utc::now().format("-%Y%m%d").to_string();
    let expected = dir.path().join(format!("app{}.log", today));
    assert!(expected.exists(), "expected {:?} to exist", expected);
  }

  #[test]
  fn daily_rolls_across_midnight_utc() {
    use chrono::{TimeZone, Utc};

    fn event_at(ts: chrono::DateTime<Utc>) -> Event {
      let mut timestamp = now();
      timestamp.epoch_ms = ts.timestamp_millis() as u64;
      timestamp.instant = ts;
      timestamp.rfc3339 = ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
      Event::new(timestamp, Level::Information, "t", "hello", smallvec::smallvec![], None)
    }

    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("app.log");
    let sink = FileSink::new(&base, RollPeriod::Daily).unwrap();

    let before_midnight = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
    let after_midnight = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    sink.emit(&event_at(before_midnight)).unwrap();
    sink.emit(&event_at(after_midnight)).unwrap();
    sink.flush().unwrap();

    let first = dir.path().join("app-20260131.log");
    let second = dir.path().join("app-20260201.log");
    assert!(first.exists(), "expected {:?} to exist", first);
    assert!(second.exists(), "expected {:?} to exist", second);

    let mut c1 = String::new();
    std::fs::File::open(&first).unwrap().read_to_string(&mut c1).unwrap();
    assert_eq!(c1.lines().count(), 1);

    let mut c2 = String::new();
    std::fs::File::open(&second).unwrap().read_to_string(&mut c2).unwrap();
    assert_eq!(c2.lines().count(), 1);

    // No file opened at construction time (today's real date) should exist.
    let stray = dir.path().join(format!("app{}.log", Utc::now().format("-%Y%m%d")));
    if stray != first && stray != second {
      assert!(!stray.exists(), "unexpected stray file {:?}", stray);
    }
  }

  #[test]
  fn appends_across_multiple_emits_without_truncating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let sink = FileSink::new(&path, RollPeriod::Infinite).unwrap();
    sink.emit(&sample_event()).unwrap();
    sink.emit(&sample_event()).unwrap();
    sink.flush().unwrap();

    let mut contents = String::new();
    std::fs::File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
    assert_eq!(contents.lines().count(), 2);
  }
}
