use std::{fs::File, fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// JSONL sink for engine events.
///
/// Best-effort: the first failure warns on stderr and turns the sink
/// off, so engine commands never fail because of tracing.
pub struct TraceLogger {
    sink: Mutex<Option<File>>,
}

impl TraceLogger {
    /// Append to `path`, creating it if needed.
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);
        let sink = match file {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("Warning: trace disabled, could not open '{}': {}", path, e);
                None
            }
        };
        Self { sink: Mutex::new(sink) }
    }

    pub fn disabled() -> Self {
        Self { sink: Mutex::new(None) }
    }

    /// Logger for an optional path; no path means tracing is off.
    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or_else(Self::disabled, Self::new)
    }

    pub fn log(&self, event: &TraceEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let Some(file) = sink.as_mut() else {
            return;
        };

        let written = serde_json::to_string(event)
            .map_err(|e| e.to_string())
            .and_then(|line| writeln!(file, "{}", line).map_err(|e| e.to_string()));

        if let Err(e) = written {
            eprintln!("Warning: trace disabled after {} event: {}", event.command, e);
            *sink = None;
        }
    }
}
