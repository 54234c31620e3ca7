//! JSON line-delimited diagnostic logging.
//!
//! The pipeline never prints to stdout. Anything a verbose run wants to
//! surface (feature-name collisions, grid-search winners, per-trial
//! statistics) is emitted as one JSON object per line through a
//! [`DiagnosticsLog`]. A disabled log drops events without formatting them.

use std::cell::RefCell;
use std::io::{self, Write};

use serde_json::{json, Value};

/// Sink for diagnostic events, one JSON object per line.
///
/// Interior mutability keeps the log usable behind shared references; the
/// pipeline is single-threaded, so a `RefCell` is sufficient.
pub struct DiagnosticsLog {
    sink: Option<RefCell<Box<dyn Write>>>,
}

impl DiagnosticsLog {
    /// A log that discards every event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// A log that writes JSONL records to the given sink.
    pub fn to_writer(writer: Box<dyn Write>) -> Self {
        Self {
            sink: Some(RefCell::new(writer)),
        }
    }

    /// A log that writes JSONL records to standard error.
    pub fn stderr() -> Self {
        Self::to_writer(Box::new(io::stderr()))
    }

    /// Whether events will actually be recorded.
    ///
    /// Callers with expensive payloads can skip building them when the log
    /// is disabled.
    pub fn enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Record one event. Write failures are swallowed: diagnostics are
    /// never allowed to fail the run.
    pub fn event(&self, kind: &str, data: Value) {
        if let Some(sink) = &self.sink {
            let record = json!({ "event": kind, "data": data });
            let mut writer = sink.borrow_mut();
            let _ = writeln!(writer, "{}", record);
        }
    }
}
