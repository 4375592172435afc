#[cfg(test)]
mod __test__ {
  use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
  use crate::error::LogError;

  fn breaker(failure_threshold: u32, reset_timeout_ms: u64) -> CircuitBreaker {
    CircuitBreaker::new(CircuitBreakerConfig::new(failure_threshold, reset_timeout_ms).unwrap())
  }

  #[test]
  fn construction_rejects_zero_thresholds() {
    assert!(matches!(
      CircuitBreakerConfig::new(0, 100),
      Err(LogError::InvalidThreshold { field: "failure_threshold", .. })
    ));
    assert!(matches!(
      CircuitBreakerConfig::new(3, 0),
      Err(LogError::InvalidThreshold { field: "reset_timeout_ms", .. })
    ));
  }

  #[test]
  fn opens_after_consecutive_failures_reach_threshold() {
    let cb = breaker(3, 50_000);
    for _ in 0..2 {
      let result: Option<()> = cb.call(|| Err::<(), ()>(()));
      assert_eq!(result, None);
    }
    assert_eq!(cb.stats().current_state, CircuitState::Closed);

    let result: Option<()> = cb.call(|| Err::<(), ()>(()));
    assert_eq!(result, None);
    assert_eq!(cb.stats().current_state, CircuitState::Open);
  }

  #[test]
  fn open_breaker_blocks_calls_without_invoking_f() {
    let cb = breaker(1, 50_000);
    let _: Option<()> = cb.call(|| Err::<(), ()>(()));
    assert_eq!(cb.stats().current_state, CircuitState::Open);

    let mut invoked = false;
    let result = cb.call(|| {
      invoked = true;
      Ok::<(), ()>(())
    });
    assert_eq!(result, None);
    assert!(!invoked);
  }

  #[test]
  fn transitions_to_half_open_after_reset_timeout_elapses() {
    let cb = breaker(1, 1);
    let _: Option<()> = cb.call(|| Err::<(), ()>(()));
    assert_eq!(cb.stats().current_state, CircuitState::Open);

    std::thread::sleep(std::time::Duration::from_millis(5));

    let result = cb.call(|| Ok::<&str, ()>("ok"));
    assert_eq!(result, Some("ok"));
    assert_eq!(cb.stats().current_state, CircuitState::Closed);
  }

  #[test]
  fn half_open_failure_reopens_the_breaker() {
    let cb = breaker(1, 1);
    let _: Option<()> = cb.call(|| Err::<(), ()>(()));
    std::thread::sleep(std::time::Duration::from_millis(5));

    let result: Option<()> = cb.call(|| Err::<(), ()>(()));
    assert_eq!(result, None);
    assert_eq!(cb.stats().current_state, CircuitState::Open);
  }

  #[test]
  fn manual_reset_forces_closed_and_zeroes_counter() {
    let cb = breaker(1, 50_000);
    let _: Option<()> = cb.call(|| Err::<(), ()>(()));
    assert_eq!(cb.stats().current_state, CircuitState::Open);

    cb.reset();
    let stats = cb.stats();
    assert_eq!(stats.current_state, CircuitState::Closed);
    assert_eq!(stats.consecutive_failures, 0);
  }
}
