mod __test__;

use crate::error::SinkError;
use crate::event::Event;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// How often the file sink starts a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPeriod {
  Infinite,
  Daily,
  Hourly,
}

struct FileState {
  file: std::fs::File,
  path: PathBuf,
  last_roll_time: DateTime<Utc>,
}

/// Appends rendered lines to a file, rolling to a new path when the
/// event's timestamp crosses into a different calendar period.
///
/// Naming follows `<basename>[-YYYYMMDD[HH]]<ext>`, suffix inserted
/// before the extension. No per-line flush — callers that need a
/// durability point call [`Sink::flush`].
///
/// The target file is opened lazily, on the first `emit`, using that
/// event's own timestamp — not construction time — so a sink that never
/// receives an event never creates a stray empty file, and the first
/// file it does create is named for the event that caused it.
pub struct FileSink {
  base_path: PathBuf,
  period: RollPeriod,
  state: Mutex<Option<FileState>>,
}

impl FileSink {
  pub fn new(base_path: impl Into<PathBuf>, period: RollPeriod) -> Result<Self, SinkError> {
    Ok(Self {
      base_path: base_path.into(),
      period,
      state: Mutex::new(None),
    })
  }

  fn ensure_current_file(&self, slot: &mut Option<FileState>, now: DateTime<Utc>) -> Result<(), SinkError> {
    let needs_roll = match slot {
      None => true,
      Some(state) => match self.period {
        RollPeriod::Infinite => false,
        RollPeriod::Daily => state.last_roll_time.year() != now.year() || state.last_roll_time.ordinal() != now.ordinal(),
        RollPeriod::Hourly => {
          state.last_roll_time.year() != now.year()
            || state.last_roll_time.ordinal() != now.ordinal()
            || state.last_roll_time.hour() != now.hour()
        },
      },
    };

    if needs_roll {
      let new_path = path_for_period(&self.base_path, self.period, now);
      let same_path = matches!(slot, Some(state) if state.path == new_path);
      if same_path {
        if let Some(state) = slot {
          state.last_roll_time = now;
        }
      } else {
        let file = open_append(&new_path)?;
        *slot = Some(FileState { file, path: new_path, last_roll_time: now });
      }
    }

    Ok(())
  }
}

fn open_append(path: &Path) -> Result<std::fs::File, SinkError> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent)?;
    }
  }
  Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn path_for_period(base_path: &Path, period: RollPeriod, now: DateTime<Utc>) -> PathBuf {
  if period == RollPeriod::Infinite {
    return base_path.to_path_buf();
  }

  let suffix = match period {
    RollPeriod::Infinite => unreachable!(),
    RollPeriod::Daily => now.format("-%Y%m%d").to_string(),
    RollPeriod::Hourly => now.format("-%Y%m%d%H").to_string(),
  };

  let extension = base_path.extension().and_then(|e| e.to_str());
  let stem = base_path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
  let parent = base_path.parent().unwrap_or_else(|| Path::new(""));

  let file_name = match extension {
    Some(ext) => format!("{}{}.{}", stem, suffix, ext),
    None => format!("{}{}", stem, suffix),
  };

  parent.join(file_name)
}

fn render_line(event: &Event) -> String {
  let mut line = format!("{} [{}] {}", event.timestamp.rfc3339, event.level.full_name(), event.rendered);
  if !event.properties.is_empty() {
    line.push(' ');
    let mut props = String::new();
    crate::clef::write_properties_object(&mut props, &event.properties);
    line.push_str(&props);
  }
  line
}

impl super::Sink for FileSink {
  fn emit(&self, event: &Event) -> Result<(), SinkError> {
    let mut slot = self.state.lock().map_err(|_| SinkError::Other("file sink state poisoned".into()))?;
    self.ensure_current_file(&mut slot, event.timestamp.instant)?;

    let state = slot.as_mut().expect("ensure_current_file always populates the slot");
    let line = render_line(event);
    state.file.write_all(line.as_bytes())?;
    state.file.write_all(b"\n")?;
    Ok(())
  }

  fn flush(&self) -> Result<(), SinkError> {
    let mut slot = self.state.lock().map_err(|_| SinkError::Other("file sink state poisoned".into()))?;
    if let Some(state) = slot.as_mut() {
      state.file.flush()?;
    }
    Ok(())
  }
}
