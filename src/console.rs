//! Console sink for the script's diagnostic output.

use std::cell::RefCell;

/// Destination for `console.log`-style diagnostic lines.
pub trait Console {
  fn log(&self, line: &str);
}

/// Writes each line to stderr.
#[derive(Debug, Default)]
pub struct StderrConsole;

impl Console for StderrConsole {
  fn log(&self, line: &str) {
    eprintln!("{line}");
  }
}

/// Captures lines in order, for tests and report generation.
#[derive(Debug, Default)]
pub struct RecordingConsole {
  lines: RefCell<Vec<String>>,
}

impl RecordingConsole {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> Vec<String> {
    self.lines.borrow().clone()
  }
}

impl Console for RecordingConsole {
  fn log(&self, line: &str) {
    self.lines.borrow_mut().push(line.to_string());
  }
}
