
use crate::value::JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;

const LATENCY_WINDOW_CAP: usize = 1000;

#[derive(Debug, Clone, Default)]
struct SinkMetrics {
  events_total: u64,
  events_dropped: u64,
  events_failed: u64,
  last_error: Option<String>,
  latencies_us: Vec<u64>,
}

impl SinkMetrics {
  fn record_latency(&mut self, latency_us: u64) {
    if self.latencies_us.len() == LATENCY_WINDOW_CAP {
      self.latencies_us.remove(0);
    }
    self.latencies_us.push(latency_us);
  }

  fn percentile(&self, fraction_times_100: usize) -> Option<u64> {
    if self.latencies_us.is_empty() {
      return None;
    }
    let mut sorted = self.latencies_us.clone();
    sorted.sort_unstable();
    let n = sorted.len();
    let index = (n * fraction_times_100 / 100).min(n - 1);
    Some(sorted[index])
  }

  fn to_json(&self, sink_id: &str) -> JsonValue {
    let mut fields = vec![
      ("sink".to_string(), JsonValue::string(sink_id)),
      ("events_total".to_string(), JsonValue::Int(self.events_total as i64)),
      ("events_dropped".to_string(), JsonValue::Int(self.events_dropped as i64)),
      ("events_failed".to_string(), JsonValue::Int(self.events_failed as i64)),
    ];
    fields.push((
      "last_error".to_string(),
      match &self.last_error {
        Some(err) => JsonValue::string(err),
        None => JsonValue::Null,
      },
    ));
    fields.push((
      "latency_p50_us".to_string(),
      self.percentile(50).map(|v| JsonValue::Int(v as i64)).unwrap_or(JsonValue::Null),
    ));
    fields.push((
      "latency_p95_us".to_string(),
      self.percentile(95).map(|v| JsonValue::Int(v as i64)).unwrap_or(JsonValue::Null),
    ));
    JsonValue::Map(fields)
  }
}

/// Per-sink counters and a bounded sliding latency window. A single
/// mutex guards the whole map — metrics updates are not on any hot
/// path that needs finer-grained locking.
pub struct MetricsStore {
  sinks: Mutex<HashMap<String, SinkMetrics>>,
}

impl MetricsStore {
  pub fn new() -> Self {
    Self { sinks: Mutex::new(HashMap::new()) }
  }

  pub fn record_emit(&self, sink_id: &str, latency_us: u64) {
    let mut sinks = self.sinks.lock().expect("metrics store poisoned");
    let entry = sinks.entry(sink_id.to_string()).or_default();
    entry.events_total += 1;
    entry.record_latency(latency_us);
  }

  pub fn record_drop(&self, sink_id: &str) {
    let mut sinks = self.sinks.lock().expect("metrics store poisoned");
    let entry = sinks.entry(sink_id.to_string()).or_default();
    entry.events_total += 1;
    entry.events_dropped += 1;
  }

  pub fn record_failure(&self, sink_id: &str, error: impl Into<String>) {
    let mut sinks = self.sinks.lock().expect("metrics store poisoned");
    let entry = sinks.entry(sink_id.to_string()).or_default();
    entry.events_total += 1;
    entry.events_failed += 1;
    entry.last_error = Some(error.into());
  }

  pub fn latency_p50_us(&self, sink_id: &str) -> Option<u64> {
    self.sinks.lock().expect("metrics store poisoned").get(sink_id).and_then(|m| m.percentile(50))
  }

  pub fn latency_p95_us(&self, sink_id: &str) -> Option<u64> {
    self.sinks.lock().expect("metrics store poisoned").get(sink_id).and_then(|m| m.percentile(95))
  }

  /// `{timestamp, sinks: [...]}`, one object per known sink id, in
  /// arbitrary but stable-per-call order.
  pub fn to_json(&self, timestamp_rfc3339: &str) -> JsonValue {
    let sinks = self.sinks.lock().expect("metrics store poisoned");
    let mut ids: Vec<&String> = sinks.keys().collect();
    ids.sort();
    let sink_entries = ids.iter().map(|id| sinks[*id].to_json(id)).collect();
    JsonValue::Map(vec![
      ("timestamp".to_string(), JsonValue::string(timestamp_rfc3339)),
      ("sinks".to_string(), JsonValue::List(sink_entries)),
    ])
  }
}

impl Default for MetricsStore {
  fn default() -> Self {
    Self::new()
  }
}
