#[cfg(test)]
mod __test__ {
  use crate::event::Event;
  use crate::level::Level;
  use crate::sink::console::{ConsoleSink, DEFAULT_TEMPLATE};
  use crate::timestamp::now;

  fn sample_event() -> Event {
    Event::new(now(), Level::Information, "t", "hello world", smallvec::smallvec![], None)
  }

  #[test]
  fn default_template_contains_all_three_tokens() {
    assert!(DEFAULT_TEMPLATE.contains("{timestamp}"));
    assert!(DEFAULT_TEMPLATE.contains("{level}"));
    assert!(DEFAULT_TEMPLATE.contains("{message}"));
  }

  #[test]
  fn uncolored_render_substitutes_all_tokens() {
    let sink = ConsoleSink::new().with_colors(false);
    let rendered = sink.render(&sample_event());
    assert!(rendered.contains("Information"));
    assert!(rendered.contains("hello world"));
    assert!(!rendered.contains('{'));
  }

  #[test]
  fn colored_render_wraps_level_in_escape_codes() {
    let sink = ConsoleSink::new().with_colors(true);
    let rendered = sink.render(&sample_event());
    assert!(rendered.contains("\x1b["));
    assert!(rendered.contains("\x1b[0m"));
  }

  #[test]
  fn custom_template_literal_text_is_preserved() {
    let sink = ConsoleSink::new().with_colors(false).with_template("[{level}] >> {message}");
    let rendered = sink.render(&sample_event());
    assert_eq!(rendered, "[Information] >> hello world");
  }

  #[test]
  fn emit_does_not_error_on_either_stream() {
    let sink_low = ConsoleSink::new().with_stderr_threshold(Level::Fatal);
    assert!(sink_low.emit(&sample_event()).is_ok());

    let sink_high = ConsoleSink::new().with_stderr_threshold(Level::Verbose);
    assert!(sink_high.emit(&sample_event()).is_ok());
  }
}
