mod __test__;

use crate::error::LogError;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// The three states a [`CircuitBreaker`] can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
  Closed,
  Open,
  HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
  pub failure_threshold: u32,
  pub reset_timeout_ms: u64,
}

impl CircuitBreakerConfig {
  pub fn new(failure_threshold: u32, reset_timeout_ms: u64) -> Result<Self, LogError> {
    if failure_threshold == 0 {
      return Err(LogError::InvalidThreshold {
        field: "failure_threshold",
        value: failure_threshold as i64,
      });
    }
    if reset_timeout_ms == 0 {
      return Err(LogError::InvalidThreshold {
        field: "reset_timeout_ms",
        value: reset_timeout_ms as i64,
      });
    }
    Ok(Self { failure_threshold, reset_timeout_ms })
  }
}

struct Inner {
  state: CircuitState,
  consecutive_failures: u32,
  last_failure_time_ms: Option<u64>,
}

/// Isolates a sink (or any fallible call) from repeated failures.
/// `Closed` trips to `Open` after `failure_threshold` consecutive
/// failures; `Open` lazily transitions to `HalfOpen` once
/// `reset_timeout_ms` has elapsed since the last failure, checked at
/// call time rather than by a timer. A `HalfOpen` probe closes the
/// breaker on success and reopens it on failure.
pub struct CircuitBreaker {
  config: CircuitBreakerConfig,
  inner: Mutex<Inner>,
}

pub struct Stats {
  pub consecutive_failures: u32,
  pub current_state: CircuitState,
  pub last_failure_time_ms: Option<u64>,
}

impl CircuitBreaker {
  pub fn new(config: CircuitBreakerConfig) -> Self {
    Self {
      config,
      inner: Mutex::new(Inner {
        state: CircuitState::Closed,
        consecutive_failures: 0,
        last_failure_time_ms: None,
      }),
    }
  }

  /// Runs `f` outside the lock iff the breaker allows it. Returns `None`
  /// if the breaker was `Open` at entry, or if `f` itself fails.
  pub fn call<R, E>(&self, f: impl FnOnce() -> Result<R, E>) -> Option<R> {
    if !self.allow_call() {
      return None;
    }

    match f() {
      Ok(value) => {
        self.on_success();
        Some(value)
      },
      Err(_) => {
        self.on_failure();
        None
      },
    }
  }

  fn allow_call(&self) -> bool {
    let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
    match inner.state {
      CircuitState::Closed => true,
      CircuitState::HalfOpen => true,
      CircuitState::Open => {
        let elapsed_ok = inner
          .last_failure_time_ms
          .map(|last| now_ms().saturating_sub(last) >= self.config.reset_timeout_ms)
          .unwrap_or(true);
        if elapsed_ok {
          inner.state = CircuitState::HalfOpen;
          true
        } else {
          false
        }
      },
    }
  }

  fn on_success(&self) {
    let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
    inner.state = CircuitState::Closed;
    inner.consecutive_failures = 0;
  }

  fn on_failure(&self) {
    let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
    inner.last_failure_time_ms = Some(now_ms());
    match inner.state {
      CircuitState::HalfOpen => {
        inner.state = CircuitState::Open;
      },
      CircuitState::Closed | CircuitState::Open => {
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.config.failure_threshold {
          inner.state = CircuitState::Open;
        }
      },
    }
  }

  pub fn reset(&self) {
    let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
    inner.state = CircuitState::Closed;
    inner.consecutive_failures = 0;
    inner.last_failure_time_ms = None;
  }

  pub fn stats(&self) -> Stats {
    let inner = self.inner.lock().expect("circuit breaker mutex poisoned");
    Stats {
      consecutive_failures: inner.consecutive_failures,
      current_state: inner.state,
      last_failure_time_ms: inner.last_failure_time_ms,
    }
  }
}

fn now_ms() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}
