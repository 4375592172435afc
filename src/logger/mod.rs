mod __test__;

use crate::context;
use crate::error::ErrorHandler;
use crate::event::{Enricher, Event, Properties};
use crate::filter::Filter;
use crate::level::Level;
use crate::metrics::MetricsStore;
use crate::sink::SinkEntry;
use crate::template;
use crate::timestamp;
use std::sync::Arc;
use std::time::Instant;

/// Construction-time configuration for a [`Logger`]. Plain data plus
/// ordinary `Vec` pushes — the fluent multi-option builder DSL some
/// logging libraries grow is out of scope; this struct is the minimum
/// needed to make a `Logger` constructible at all.
#[derive(Clone)]
pub struct LoggerConfig {
  pub min_level: Level,
  pub context_properties: Properties,
  pub source: Option<String>,
}

impl LoggerConfig {
  pub fn new(min_level: Level) -> Self {
    Self {
      min_level,
      context_properties: Properties::new(),
      source: None,
    }
  }
}

impl Default for LoggerConfig {
  fn default() -> Self {
    Self::new(Level::Information)
  }
}

/// Dispatches rendered events to an ordered list of sinks through an
/// enrich → context-merge → filter pipeline. Cheap to derive: every
/// `for_*`/`add_*` method returns a new `Logger` that shares the parent's
/// sinks via `Arc` rather than cloning them.
pub struct Logger {
  config: LoggerConfig,
  sinks: Arc<Vec<SinkEntry>>,
  enrichers: Vec<Enricher>,
  filters: Vec<Filter>,
  metrics: Arc<MetricsStore>,
  error_handler: ErrorHandler,
}

impl Logger {
  pub fn new(config: LoggerConfig, sinks: Vec<SinkEntry>) -> Self {
    Self {
      config,
      sinks: Arc::new(sinks),
      enrichers: Vec::new(),
      filters: Vec::new(),
      metrics: Arc::new(MetricsStore::new()),
      error_handler: crate::error::default_error_handler_arc(),
    }
  }

  /// Counters and latency percentiles per sink id, shared by every
  /// `Logger` derived from this one.
  pub fn metrics(&self) -> &Arc<MetricsStore> {
    &self.metrics
  }

  /// Replaces the handler notified when a sink's `emit` fails during
  /// dispatch. Shares sinks/enrichers/filters/metrics with `self`.
  pub fn with_error_handler(&self, error_handler: ErrorHandler) -> Logger {
    Logger {
      config: self.config.clone(),
      sinks: self.sinks.clone(),
      enrichers: self.enrichers.clone(),
      filters: self.filters.clone(),
      metrics: self.metrics.clone(),
      error_handler,
    }
  }

  pub fn min_level(&self) -> Level {
    self.config.min_level
  }

  /// The dispatch hot path. Below `min_level`, returns before building a
  /// timestamp, an `Event`, or touching any sink — the only cost paid by
  /// a filtered-out call is the level comparison itself.
  pub fn write(&self, level: Level, template: &str, properties: Properties, exception: Option<Arc<dyn crate::event::ExceptionInfo>>) {
    if level < self.config.min_level {
      return;
    }

    let rendered = template::render(template, &properties);
    let timestamp = timestamp::now();
    let correlation_id = context::get_correlation_id();

    let mut event = Event::new(timestamp, level, template, rendered, properties, correlation_id);
    event.exception_info = exception;

    for enricher in &self.enrichers {
      event = enricher(event);
    }

    let ambient = context::current_properties();
    let mut merged: Properties = ambient.into_iter().collect();
    merged.extend(self.config.context_properties.iter().cloned());
    let ambient_correlation = context::get_correlation_id();
    let event = event.with_prepended_properties(merged).with_correlation_id(ambient_correlation);

    if !self.filters.iter().all(|filter| filter(&event)) {
      // Record a drop for every sink this event would otherwise have
      // reached (per-sink level gating still applies — a sink the event
      // wouldn't have passed anyway isn't charged for this drop).
      for entry in self.sinks.iter() {
        if entry.accepts(event.level) {
          self.metrics.record_drop(&entry.id);
        }
      }
      return;
    }

    for entry in self.sinks.iter() {
      if !entry.accepts(event.level) {
        continue;
      }
      let started = Instant::now();
      match entry.sink.emit(&event) {
        Ok(()) => {
          let latency_us = started.elapsed().as_micros() as u64;
          self.metrics.record_emit(&entry.id, latency_us);
        },
        Err(err) => {
          self.metrics.record_failure(&entry.id, err.to_string());
          (self.error_handler)(&err);
        },
      }
    }
  }

  pub fn verbose(&self, template: &str, properties: Properties) {
    self.write(Level::Verbose, template, properties, None);
  }

  pub fn debug(&self, template: &str, properties: Properties) {
    self.write(Level::Debug, template, properties, None);
  }

  pub fn information(&self, template: &str, properties: Properties) {
    self.write(Level::Information, template, properties, None);
  }

  pub fn warning(&self, template: &str, properties: Properties) {
    self.write(Level::Warning, template, properties, None);
  }

  pub fn error(&self, template: &str, properties: Properties, exception: Option<Arc<dyn crate::event::ExceptionInfo>>) {
    self.write(Level::Error, template, properties, exception);
  }

  pub fn fatal(&self, template: &str, properties: Properties, exception: Option<Arc<dyn crate::event::ExceptionInfo>>) {
    self.write(Level::Fatal, template, properties, exception);
  }

  /// Returns a derived `Logger` whose static context carries `properties`
  /// prepended ahead of the parent's. Sinks are shared, not copied.
  pub fn for_context(&self, properties: impl IntoIterator<Item = (String, crate::value::JsonValue)>) -> Logger {
    let mut context_properties: Properties = properties.into_iter().collect();
    context_properties.extend(self.config.context_properties.iter().cloned());
    Logger {
      config: LoggerConfig { context_properties, ..self.config.clone() },
      sinks: self.sinks.clone(),
      enrichers: self.enrichers.clone(),
      filters: self.filters.clone(),
      metrics: self.metrics.clone(),
      error_handler: self.error_handler.clone(),
    }
  }

  pub fn for_source(&self, source: impl Into<String>) -> Logger {
    Logger {
      config: LoggerConfig { source: Some(source.into()), ..self.config.clone() },
      sinks: self.sinks.clone(),
      enrichers: self.enrichers.clone(),
      filters: self.filters.clone(),
      metrics: self.metrics.clone(),
      error_handler: self.error_handler.clone(),
    }
  }

  pub fn with_enricher(&self, enricher: Enricher) -> Logger {
    let mut enrichers = vec![enricher];
    enrichers.extend(self.enrichers.iter().cloned());
    Logger {
      config: self.config.clone(),
      sinks: self.sinks.clone(),
      enrichers,
      filters: self.filters.clone(),
      metrics: self.metrics.clone(),
      error_handler: self.error_handler.clone(),
    }
  }

  pub fn add_filter(&self, filter: Filter) -> Logger {
    let mut filters = vec![filter];
    filters.extend(self.filters.iter().cloned());
    Logger {
      config: self.config.clone(),
      sinks: self.sinks.clone(),
      enrichers: self.enrichers.clone(),
      filters,
      metrics: self.metrics.clone(),
      error_handler: self.error_handler.clone(),
    }
  }

  pub fn add_min_level_filter(&self, min: Level) -> Logger {
    self.add_filter(crate::filter::level_filter(min))
  }

  /// Flushes sinks in declaration order; one sink's failure doesn't stop
  /// the others.
  pub fn flush(&self) {
    for entry in self.sinks.iter() {
      let _ = entry.sink.flush();
    }
  }

  /// Closes sinks in declaration order; one sink's failure doesn't stop
  /// the others.
  pub fn close(&self) {
    for entry in self.sinks.iter() {
      let _ = entry.sink.close();
    }
  }
}
