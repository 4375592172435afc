
use std::fmt;

/// Log severity, totally ordered from least to most severe.
///
/// `#[repr(u8)]` keeps the representation compact and makes the integer
/// projection (`as u8`) free; the derived `Ord` gives the total order the
/// dispatch fast path relies on (`level < logger.min_level`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
  Verbose = 0,
  Debug = 1,
  Information = 2,
  Warning = 3,
  Error = 4,
  Fatal = 5,
}

impl Level {
  pub const ALL: [Level; 6] = [
    Level::Verbose,
    Level::Debug,
    Level::Information,
    Level::Warning,
    Level::Error,
    Level::Fatal,
  ];

  /// Integer projection, `0..=5`.
  #[inline]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// Full, human-readable name (`@l` in CLEF output).
  pub const fn full_name(self) -> &'static str {
    match self {
      Level::Verbose => "Verbose",
      Level::Debug => "Debug",
      Level::Information => "Information",
      Level::Warning => "Warning",
      Level::Error => "Error",
      Level::Fatal => "Fatal",
    }
  }

  /// Three-letter short name, used by the console sink's default template.
  pub const fn short_name(self) -> &'static str {
    match self {
      Level::Verbose => "VRB",
      Level::Debug => "DBG",
      Level::Information => "INF",
      Level::Warning => "WRN",
      Level::Error => "ERR",
      Level::Fatal => "FTL",
    }
  }

  /// Case-insensitive parse accepting either the full or short name.
  ///
  /// Returns `None` rather than defaulting, so callers parsing
  /// configuration can reject an unrecognized level instead of silently
  /// downgrading to something like `Information`.
  pub fn parse(s: &str) -> Option<Level> {
    for level in Level::ALL {
      if s.eq_ignore_ascii_case(level.full_name()) || s.eq_ignore_ascii_case(level.short_name()) {
        return Some(level);
      }
    }
    None
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.full_name())
  }
}

impl std::str::FromStr for Level {
  type Err = crate::error::LogError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Level::parse(s).ok_or_else(|| crate::error::LogError::UnknownLevel(s.to_string()))
  }
}
