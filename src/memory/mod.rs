
use crate::error::LogError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type LimitCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Clone)]
pub struct MemoryConfig {
  pub max_queue_bytes: usize,
  pub max_event_size_bytes: usize,
  pub on_limit_exceeded: Option<LimitCallback>,
}

impl MemoryConfig {
  pub fn new(max_queue_bytes: usize, max_event_size_bytes: usize) -> Self {
    Self { max_queue_bytes, max_event_size_bytes, on_limit_exceeded: None }
  }

  pub fn with_on_limit_exceeded(mut self, callback: LimitCallback) -> Self {
    self.on_limit_exceeded = Some(callback);
    self
  }
}

/// Tracks approximate in-flight queue memory, rejecting oversized events
/// and invoking a callback when the accumulated total crosses
/// `max_queue_bytes`. Independent of the queue's own size/count
/// accounting — a sink-agnostic guard against unbounded memory growth.
pub struct MemoryTracker {
  config: Mutex<MemoryConfig>,
  accumulated_bytes: AtomicUsize,
}

impl MemoryTracker {
  pub fn new(config: MemoryConfig) -> Self {
    Self {
      config: Mutex::new(config),
      accumulated_bytes: AtomicUsize::new(0),
    }
  }

  /// Rejects with [`LogError::EventTooLarge`] without recording anything
  /// if `bytes` alone exceeds `max_event_size_bytes` — the caller must not
  /// enqueue the event.
  pub fn record_enqueue(&self, bytes: usize) -> Result<(), LogError> {
    let config = self.config.lock().expect("memory tracker config poisoned");
    if bytes > config.max_event_size_bytes {
      return Err(LogError::EventTooLarge { size: bytes, max: config.max_event_size_bytes });
    }

    let new_total = self.accumulated_bytes.fetch_add(bytes, Ordering::SeqCst) + bytes;
    if new_total > config.max_queue_bytes {
      if let Some(callback) = &config.on_limit_exceeded {
        callback(new_total, config.max_queue_bytes);
      }
    }
    Ok(())
  }

  pub fn record_dequeue(&self, bytes: usize) {
    let _ = self
      .accumulated_bytes
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| Some(current.saturating_sub(bytes)));
  }

  pub fn accumulated_bytes(&self) -> usize {
    self.accumulated_bytes.load(Ordering::SeqCst)
  }

  pub fn set_config(&self, new_config: MemoryConfig) {
    let mut config = self.config.lock().expect("memory tracker config poisoned");
    let current_total = self.accumulated_bytes.load(Ordering::SeqCst);
    if current_total > new_config.max_queue_bytes {
      if let Some(callback) = &new_config.on_limit_exceeded {
        callback(current_total, new_config.max_queue_bytes);
      }
    }
    *config = new_config;
  }
}
