
use crate::error::LogError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub type ShutdownHandler = Box<dyn FnOnce() + Send>;

/// How a [`ShutdownController`] runs its registered handlers.
pub enum ShutdownStrategy {
  /// Sequential, on the caller's thread. A handler that panics or is
  /// slow still lets the rest run — each failure is only logged.
  Immediate,
  /// Each handler gets its own thread; `execute` joins all of them
  /// before returning.
  FlushPending,
  /// Sequential with a wall-clock deadline. Handlers that would start
  /// after the deadline are skipped with a warning; a handler already
  /// running past the deadline is not interrupted.
  Graceful(u64),
}

/// Runs registered handlers in LIFO order (most recently registered
/// first) exactly once. A second `execute` call fails rather than
/// running handlers twice.
pub struct ShutdownController {
  handlers: Mutex<Vec<ShutdownHandler>>,
  complete: AtomicBool,
}

impl ShutdownController {
  pub fn new() -> Self {
    Self {
      handlers: Mutex::new(Vec::new()),
      complete: AtomicBool::new(false),
    }
  }

  pub fn register(&self, handler: impl FnOnce() + Send + 'static) {
    self.handlers.lock().expect("shutdown handlers poisoned").push(Box::new(handler));
  }

  pub fn is_complete(&self) -> bool {
    self.complete.load(Ordering::SeqCst)
  }

  pub fn execute(&self, strategy: ShutdownStrategy) -> Result<(), LogError> {
    if self.complete.swap(true, Ordering::SeqCst) {
      return Err(LogError::AlreadyShutdown);
    }

    let mut handlers = self.handlers.lock().expect("shutdown handlers poisoned");
    let ordered: Vec<ShutdownHandler> = handlers.drain(..).rev().collect();
    drop(handlers);

    match strategy {
      ShutdownStrategy::Immediate => {
        for handler in ordered {
          let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(handler));
          if result.is_err() {
            eprintln!("[logrt] shutdown handler panicked");
          }
        }
      },
      ShutdownStrategy::FlushPending => {
        let join_handles: Vec<_> = ordered
          .into_iter()
          .map(|handler| std::thread::spawn(move || {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(handler));
          }))
          .collect();
        for handle in join_handles {
          let _ = handle.join();
        }
      },
      ShutdownStrategy::Graceful(timeout_seconds) => {
        let deadline = Instant::now() + Duration::from_secs(timeout_seconds);
        for handler in ordered {
          if Instant::now() >= deadline {
            eprintln!("[logrt] shutdown handler skipped: deadline exceeded");
            continue;
          }
          let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(handler));
          if result.is_err() {
            eprintln!("[logrt] shutdown handler panicked");
          }
          if Instant::now() >= deadline {
            eprintln!("[logrt] shutdown handler ran past deadline");
          }
        }
      },
    }

    Ok(())
  }

  /// Clears handlers and the completion flag. Test-only: production
  /// code shuts down once per process.
  #[cfg(test)]
  pub fn reset(&self) {
    self.handlers.lock().expect("shutdown handlers poisoned").clear();
    self.complete.store(false, Ordering::SeqCst);
  }
}

impl Default for ShutdownController {
  fn default() -> Self {
    Self::new()
  }
}
