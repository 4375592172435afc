
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A cached `{epoch_ms, instant, rfc3339_string}` triple.
#[derive(Debug, Clone)]
pub struct Timestamp {
  pub epoch_ms: u64,
  pub instant: DateTime<Utc>,
  pub rfc3339: String,
}

impl Timestamp {
  fn from_epoch_ms(epoch_ms: u64) -> Timestamp {
    let secs = (epoch_ms / 1000) as i64;
    let nanos = ((epoch_ms % 1000) * 1_000_000) as u32;
    let instant = match Utc.timestamp_opt(secs, nanos) {
      chrono::LocalResult::Single(dt) => dt,
      _ => {
        // Conversion failure degrades to the epoch.
        return Timestamp {
          epoch_ms,
          instant: Utc.timestamp_opt(0, 0).single().unwrap(),
          rfc3339: "1970-01-01T00:00:00.000Z".to_string(),
        };
      },
    };
    Timestamp {
      epoch_ms,
      instant,
      rfc3339: format_rfc3339_millis(instant),
    }
  }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ` — RFC3339 with exactly 3 fractional digits.
pub fn format_rfc3339_millis(dt: DateTime<Utc>) -> String {
  dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Global kill switch for the per-thread cache; when disabled every call
/// computes a fresh timestamp.
static CACHE_ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_cache_enabled(enabled: bool) {
  CACHE_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn cache_enabled() -> bool {
  CACHE_ENABLED.load(Ordering::Relaxed)
}

thread_local! {
  static CACHE: RefCell<Option<Timestamp>> = RefCell::new(None);
}

fn current_epoch_ms() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}

/// Returns the current timestamp, memoized per-thread at millisecond
/// granularity. No locks on the hot path: the cache lives in thread-local
/// storage, and the enable flag is a single relaxed atomic load.
pub fn now() -> Timestamp {
  if !cache_enabled() {
    return Timestamp::from_epoch_ms(current_epoch_ms());
  }

  CACHE.with(|cell| {
    let mut slot = cell.borrow_mut();
    let epoch_ms = current_epoch_ms();
    if let Some(cached) = slot.as_ref() {
      if cached.epoch_ms == epoch_ms {
        return cached.clone();
      }
    }
    let fresh = Timestamp::from_epoch_ms(epoch_ms);
    *slot = Some(fresh.clone());
    fresh
  })
}
