
use crate::circuit_breaker::CircuitBreaker;
use crate::error::{ErrorHandler, SinkError};
use crate::event::Event;
use crate::sink::Sink;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

pub struct AsyncQueueConfig {
  pub max_queue_size: usize,
  pub flush_interval_ms: u64,
  pub batch_size: usize,
  pub back_pressure_threshold: usize,
  pub error_handler: ErrorHandler,
  pub circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl AsyncQueueConfig {
  pub fn new(max_queue_size: usize, flush_interval_ms: u64, batch_size: usize) -> Self {
    Self {
      max_queue_size,
      flush_interval_ms,
      batch_size,
      back_pressure_threshold: max_queue_size,
      error_handler: crate::error::default_error_handler_arc(),
      circuit_breaker: None,
    }
  }

  pub fn with_back_pressure_threshold(mut self, threshold: usize) -> Self {
    self.back_pressure_threshold = threshold;
    self
  }

  pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
    self.error_handler = handler;
    self
  }

  pub fn with_circuit_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
    self.circuit_breaker = Some(breaker);
    self
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueueStats {
  pub enqueued: u64,
  pub emitted: u64,
  pub dropped: u64,
  pub errors: u64,
}

struct Ring {
  slots: Vec<Option<Event>>,
  head: usize,
  tail: usize,
  size: usize,
}

impl Ring {
  fn new(capacity: usize) -> Self {
    Self {
      slots: (0..capacity).map(|_| None).collect(),
      head: 0,
      tail: 0,
      size: 0,
    }
  }

  fn capacity(&self) -> usize {
    self.slots.len()
  }

  fn push_dropping_oldest(&mut self, event: Event) -> bool {
    let mut dropped = false;
    if self.size == self.capacity() {
      self.slots[self.head] = None;
      self.head = (self.head + 1) % self.capacity();
      self.size -= 1;
      dropped = true;
    }
    self.slots[self.tail] = Some(event);
    self.tail = (self.tail + 1) % self.capacity();
    self.size += 1;
    dropped
  }

  fn pop(&mut self) -> Option<Event> {
    if self.size == 0 {
      return None;
    }
    let event = self.slots[self.head].take();
    self.head = (self.head + 1) % self.capacity();
    self.size -= 1;
    event
  }
}

struct Shared {
  ring: Mutex<Ring>,
  stats: Mutex<QueueStats>,
  shutdown: AtomicBool,
  enqueued_total: AtomicU64,
}

/// Decouples a slow sink from call sites: `enqueue` never blocks on I/O,
/// only briefly on the ring buffer's mutex, dropping the oldest pending
/// event on overflow. A background thread drains the ring in batches on
/// a fixed interval, running each emit through an optional circuit
/// breaker so a consistently failing sink stops being retried every
/// cycle.
pub struct AsyncQueue {
  shared: Arc<Shared>,
  sink: Arc<dyn Sink>,
  config: Arc<AsyncQueueConfig>,
  worker: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncQueue {
  pub fn new(sink: Arc<dyn Sink>, config: AsyncQueueConfig) -> Self {
    let config = Arc::new(config);
    let shared = Arc::new(Shared {
      ring: Mutex::new(Ring::new(config.max_queue_size)),
      stats: Mutex::new(QueueStats::default()),
      shutdown: AtomicBool::new(false),
      enqueued_total: AtomicU64::new(0),
    });

    let worker = {
      let shared = shared.clone();
      let sink = sink.clone();
      let config = config.clone();
      std::thread::spawn(move || Self::worker_loop(shared, sink, config))
    };

    Self {
      shared,
      sink,
      config,
      worker: Mutex::new(Some(worker)),
    }
  }

  /// Never blocks on sink I/O. Reports via the error handler (without
  /// dropping the event) when the queue crosses its back-pressure
  /// threshold.
  pub fn enqueue(&self, event: Event) {
    self.shared.enqueued_total.fetch_add(1, Ordering::SeqCst);

    let (dropped, size_after) = {
      let mut ring = self.shared.ring.lock().expect("queue ring poisoned");
      let dropped = ring.push_dropping_oldest(event);
      (dropped, ring.size)
    };

    {
      let mut stats = self.shared.stats.lock().expect("queue stats poisoned");
      stats.enqueued += 1;
      if dropped {
        stats.dropped += 1;
      }
    }

    if size_after > self.config.back_pressure_threshold {
      (self.config.error_handler)(&SinkError::Other(format!(
        "async queue back pressure: {} pending events",
        size_after
      )));
    }
  }

  fn worker_loop(shared: Arc<Shared>, sink: Arc<dyn Sink>, config: Arc<AsyncQueueConfig>) {
    const TICK_MS: u64 = 20;
    let mut slept_ms: u64 = 0;

    loop {
      if shared.shutdown.load(Ordering::SeqCst) {
        Self::flush_once(&shared, &sink, &config);
        return;
      }

      if slept_ms >= config.flush_interval_ms {
        Self::flush_once(&shared, &sink, &config);
        slept_ms = 0;
        continue;
      }

      std::thread::sleep(Duration::from_millis(TICK_MS.min(config.flush_interval_ms.max(1))));
      slept_ms += TICK_MS;
    }
  }

  fn flush_once(shared: &Arc<Shared>, sink: &Arc<dyn Sink>, config: &Arc<AsyncQueueConfig>) {
    enum Outcome {
      Emitted,
      /// Circuit breaker rejected the call without invoking the sink —
      /// accounted as a drop, not an error (spec: circuit-open rejection
      /// is not an error).
      Rejected,
      Errored(SinkError),
    }

    loop {
      let batch: Vec<Event> = {
        let mut ring = shared.ring.lock().expect("queue ring poisoned");
        let mut batch = Vec::with_capacity(config.batch_size.min(ring.size));
        for _ in 0..config.batch_size {
          match ring.pop() {
            Some(event) => batch.push(event),
            None => break,
          }
        }
        batch
      };

      if batch.is_empty() {
        return;
      }

      for event in &batch {
        // `breaker.call` returns `None` both when the circuit rejected the
        // call outright (Open) and when the call ran and `sink.emit`
        // itself erred — those are different outcomes for the queue's own
        // accounting (dropped vs. errors), so the closure stashes the real
        // error (if any) itself rather than letting `breaker.call` discard
        // it, and a flag records whether the closure ran at all.
        let invoked = std::cell::Cell::new(false);
        let failure: std::cell::RefCell<Option<SinkError>> = std::cell::RefCell::new(None);
        let outcome = match &config.circuit_breaker {
          Some(breaker) => match breaker.call(|| {
            invoked.set(true);
            let result = sink.emit(event);
            if let Err(err) = &result {
              *failure.borrow_mut() = Some(SinkError::Other(err.to_string()));
            }
            result
          }) {
            Some(()) => Outcome::Emitted,
            None if invoked.get() => {
              Outcome::Errored(failure.into_inner().unwrap_or_else(|| SinkError::Other("sink emit failed".to_string())))
            },
            None => Outcome::Rejected,
          },
          None => match sink.emit(event) {
            Ok(()) => Outcome::Emitted,
            Err(err) => Outcome::Errored(err),
          },
        };

        let mut stats = shared.stats.lock().expect("queue stats poisoned");
        match outcome {
          Outcome::Emitted => stats.emitted += 1,
          Outcome::Rejected => stats.dropped += 1,
          Outcome::Errored(err) => {
            stats.errors += 1;
            drop(stats);
            (config.error_handler)(&err);
          },
        }
      }
    }
  }

  pub fn stats(&self) -> QueueStats {
    *self.shared.stats.lock().expect("queue stats poisoned")
  }

  pub fn in_queue(&self) -> usize {
    self.shared.ring.lock().expect("queue ring poisoned").size
  }

  /// Idempotent. Signals the worker, joins it, then drains anything left
  /// synchronously on the calling thread.
  pub fn close(&self) {
    if self.shared.shutdown.swap(true, Ordering::SeqCst) {
      return;
    }

    if let Some(handle) = self.worker.lock().expect("queue worker mutex poisoned").take() {
      let _ = handle.join();
    }

    Self::flush_once(&self.shared, &self.sink, &self.config);
  }
}

impl Drop for AsyncQueue {
  fn drop(&mut self) {
    self.close();
  }
}

/// An `AsyncQueue` is itself a [`Sink`], so it can sit in a
/// [`crate::logger::Logger`]'s sink list the same way the wrapped sink
/// would — `emit` just enqueues and returns immediately, matching the
/// pipeline's "sink emit (possibly async queue → circuit breaker → real
/// sink)" shape from the data-flow overview.
impl Sink for AsyncQueue {
  fn emit(&self, event: &Event) -> Result<(), SinkError> {
    self.enqueue(event.clone());
    Ok(())
  }

  /// Forces one synchronous drain of whatever is currently queued, then
  /// flushes the wrapped sink.
  fn flush(&self) -> Result<(), SinkError> {
    Self::flush_once(&self.shared, &self.sink, &self.config);
    self.sink.flush()
  }

  fn close(&self) -> Result<(), SinkError> {
    AsyncQueue::close(self);
    Ok(())
  }
}
