//! Diagnostic channel for the collimation engine.
//!
//! All recoverable and degraded conditions are reported here and never stop the
//! two-pass computation. The CLI's `-v` flag attaches [`StdErrObserver`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Events emitted during a collimation run.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// First pass started.
    ScanStarted {
        /// Total rows in the row set.
        rows_total: usize,
        /// Prefix rows the scanner will examine.
        rows_scanned: usize,
    },
    /// First pass finished.
    ScanFinished {
        /// Wall time of the scan pass.
        elapsed: Duration,
    },
    /// Dictionary planning finished.
    PlanFinished {
        /// Number of columns chosen for dictionary encoding.
        encoded_columns: usize,
    },
    /// Second pass started.
    MaterializeStarted,
    /// Second pass finished.
    MaterializeFinished {
        /// Wall time of the materialization pass.
        elapsed: Duration,
    },
    /// An 8-bit code buffer overflowed and was reallocated as 16-bit. Recoverable;
    /// previously written codes are preserved.
    WidthPromoted {
        /// Affected column name.
        column: String,
    },
    /// A 16-bit code buffer ran out of code space. Degraded: encoding continues
    /// with new distinct values aliasing onto already-used codes. Emitted at most
    /// once per column.
    CapacityExhausted {
        /// Affected column name.
        column: String,
    },
}

/// Observer interface for engine diagnostics.
pub trait CollimateObserver: Send + Sync {
    /// Called for every engine event.
    fn on_event(&self, _event: &EngineEvent) {}
}

/// An observer that fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn CollimateObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn CollimateObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl CollimateObserver for CompositeObserver {
    fn on_event(&self, event: &EngineEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Logs engine events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl CollimateObserver for StdErrObserver {
    fn on_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::ScanStarted {
                rows_total,
                rows_scanned,
            } => eprintln!("[collimate] determining types: scanning {rows_scanned} of {rows_total} rows"),
            EngineEvent::ScanFinished { elapsed } => {
                eprintln!("[collimate] scan done ({} ms)", elapsed.as_millis())
            }
            EngineEvent::PlanFinished { encoded_columns } => {
                eprintln!("[collimate] planned {encoded_columns} dictionary-encoded column(s)")
            }
            EngineEvent::MaterializeStarted => eprintln!("[collimate] creating columns..."),
            EngineEvent::MaterializeFinished { elapsed } => {
                eprintln!("[collimate] materialize done ({} ms)", elapsed.as_millis())
            }
            EngineEvent::WidthPromoted { column } => eprintln!(
                "[collimate] allotted encoding size exceeded (8-bit) for '{column}': reallocating as 16-bit"
            ),
            EngineEvent::CapacityExhausted { column } => eprintln!(
                "[collimate] maximum encoding size exceeded (16-bit) for '{column}': data loss may occur"
            ),
        }
    }
}
