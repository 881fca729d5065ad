use std::time::Instant;

use parking_lot::Mutex;
use snarl_graph::ModuleId;
use tracing::{debug, trace};

use super::{ImportObserver, TraceEvent, TraceLog};

/// Observer that appends every load to an ordered event log.
///
/// Loads from several threads serialize on one mutex; event order is the
/// order in which the lock was taken.
#[derive(Debug)]
pub struct TraceRecorder {
    started: Instant,
    state: Mutex<RecorderState>,
}

#[derive(Debug, Default)]
struct RecorderState {
    /// Modules whose load has started and not yet ended, outermost first.
    loading: Vec<ModuleId>,
    events: Vec<TraceEvent>,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(RecorderState::default()),
        }
    }

    /// Copy of the events captured so far.
    pub fn snapshot(&self) -> TraceLog {
        TraceLog::new(self.state.lock().events.clone())
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().events.len()
    }

    /// Modules currently loading, outermost first.
    pub fn loading(&self) -> Vec<ModuleId> {
        self.state.lock().loading.clone()
    }
}

impl ImportObserver for TraceRecorder {
    fn on_import_start(&self, module: &str, importer: Option<&str>) {
        let Ok(imported) = ModuleId::new(module) else {
            debug!(module, "ignoring load with an invalid module name");
            return;
        };
        let explicit = importer.and_then(|name| ModuleId::new(name).ok());

        let elapsed = self.started.elapsed();
        let mut state = self.state.lock();
        let importer = explicit.or_else(|| state.loading.last().cloned());
        let in_progress = state.loading.contains(&imported);
        let importer_loading = importer
            .as_ref()
            .is_some_and(|id| state.loading.contains(id));

        let event = TraceEvent {
            sequence: state.events.len() as u64,
            importer,
            imported: imported.clone(),
            elapsed,
            depth: state.loading.len(),
            in_progress,
            importer_loading,
        };
        if in_progress {
            debug!(module = %imported, importer = ?event.importer, "re-entrant import");
        } else {
            trace!(module = %imported, depth = event.depth, "import started");
        }

        state.events.push(event);
        state.loading.push(imported);
    }

    fn on_import_end(&self, module: &str) {
        let Ok(id) = ModuleId::new(module) else {
            return;
        };
        let mut state = self.state.lock();
        if let Some(pos) = state.loading.iter().rposition(|m| *m == id) {
            state.loading.remove(pos);
        }
    }
}
