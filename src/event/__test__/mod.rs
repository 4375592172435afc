#[cfg(test)]
mod __test__ {
  use crate::event::Event;
  use crate::level::Level;
  use crate::timestamp::now;
  use crate::value::JsonValue;

  fn sample_event() -> Event {
    let props = smallvec::smallvec![("path".to_string(), JsonValue::string("/x"))];
    Event::new(
      now(),
      Level::Information,
      "hit {path}",
      "hit /x",
      props,
      None,
    )
  }

  #[test]
  fn get_returns_first_insertion_on_duplicate_names() {
    let mut ev = sample_event();
    ev.properties.push(("path".to_string(), JsonValue::string("/y")));
    assert_eq!(ev.get("path").and_then(|v| v.as_str()), Some("/x"));
  }

  #[test]
  fn with_prepended_properties_orders_ambient_before_event() {
    let ev = sample_event();
    let merged = ev.with_prepended_properties(vec![
      ("request_id".to_string(), JsonValue::string("r-1")),
      ("service".to_string(), JsonValue::string("api")),
    ]);
    let names: Vec<&str> = merged.properties.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["request_id", "service", "path"]);
  }

  #[test]
  fn with_correlation_id_prefers_ambient_over_existing() {
    let ev = sample_event().with_correlation_id(Some("old".to_string()));
    let merged = ev.with_correlation_id(Some("new".to_string()));
    assert_eq!(merged.correlation_id.as_deref(), Some("new"));

    let ev2 = sample_event().with_correlation_id(Some("kept".to_string()));
    let unchanged = ev2.with_correlation_id(None);
    assert_eq!(unchanged.correlation_id.as_deref(), Some("kept"));
  }
}
