
use crate::clef::write_clef;
use crate::error::SinkError;
use crate::event::Event;
use crate::sink::Sink;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Writes one CLEF record per line (NDJSON), never pretty-printed.
pub struct JsonSink {
  file: Mutex<File>,
}

impl JsonSink {
  pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Self { file: Mutex::new(file) })
  }
}

impl Sink for JsonSink {
  fn emit(&self, event: &Event) -> Result<(), SinkError> {
    let mut line = String::with_capacity(256);
    write_clef(&mut line, event);
    line.push('\n');

    let mut file = self.file.lock().map_err(|_| SinkError::Other("json sink file poisoned".into()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
  }

  fn flush(&self) -> Result<(), SinkError> {
    let mut file = self.file.lock().map_err(|_| SinkError::Other("json sink file poisoned".into()))?;
    file.flush()?;
    Ok(())
  }

  fn close(&self) -> Result<(), SinkError> {
    self.flush()
  }
}
