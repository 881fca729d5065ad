//! Runtime import tracing.
//!
//! The host runtime owns the actual load interception and exposes it as an
//! [`ImportHook`]. A [`RuntimeImportTracer`] opens scoped
//! [`TraceSession`]s on that hook; each session registers its own
//! [`TraceRecorder`] and removes it again when the session ends, however it
//! ends.
//!
//! ```rust
//! use snarl_analysis::trace::{ForwardingHook, RuntimeImportTracer};
//!
//! # fn main() -> Result<(), snarl_analysis::TraceSetupError> {
//! let hook = ForwardingHook::new();
//! let tracer = RuntimeImportTracer::new(hook.clone());
//!
//! let (_, log) = tracer.trace(|| {
//!     hook.start("app", None);
//!     hook.start("app.models", None);
//!     hook.end("app.models");
//!     hook.end("app");
//! })?;
//!
//! assert_eq!(log.len(), 2);
//! assert!(!hook.is_installed());
//! # Ok(())
//! # }
//! ```

mod event;
mod hook;
mod recorder;

pub use event::{TraceEvent, TraceLog};
pub use hook::ForwardingHook;
pub use recorder::TraceRecorder;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::TraceSetupError;

/// Receives load notifications from the host.
///
/// Every `on_import_start` is followed by exactly one `on_import_end` for
/// the same module, including re-entrant loads that return a partially
/// initialized module. Calls may arrive from any thread.
pub trait ImportObserver: Send + Sync {
    fn on_import_start(&self, module: &str, importer: Option<&str>);
    fn on_import_end(&self, module: &str);
}

/// Host capability that routes load notifications to one observer.
pub trait ImportHook: Send + Sync {
    /// Begin delivering notifications to `observer`. Fails if the host
    /// cannot register an interception point.
    fn install(&self, observer: Arc<dyn ImportObserver>) -> Result<(), TraceSetupError>;

    /// Stop delivering notifications. Must be safe to call more than once.
    fn uninstall(&self);
}

/// Opens trace sessions on an import hook, one at a time.
pub struct RuntimeImportTracer {
    hook: Box<dyn ImportHook>,
    active: AtomicBool,
}

impl std::fmt::Debug for RuntimeImportTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeImportTracer")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl RuntimeImportTracer {
    pub fn new(hook: impl ImportHook + 'static) -> Self {
        Self {
            hook: Box::new(hook),
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Install a fresh recorder on the hook.
    ///
    /// Fails fast with [`TraceSetupError::AlreadyActive`] while another
    /// session from this tracer is open, or with the hook's own error if it
    /// refuses registration.
    pub fn start(&self) -> Result<TraceSession<'_>, TraceSetupError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TraceSetupError::AlreadyActive);
        }

        let recorder = Arc::new(TraceRecorder::new());
        if let Err(err) = self.hook.install(recorder.clone()) {
            self.active.store(false, Ordering::Release);
            return Err(err);
        }
        debug!("import trace session started");

        Ok(TraceSession {
            tracer: self,
            recorder,
            released: false,
        })
    }

    /// Run `f` inside a session and return its result with the log.
    ///
    /// The hook is removed even if `f` panics, but the panic unwinds past
    /// this call and the log goes with it. To keep events from a load that
    /// may fail, open the session with [`start`](Self::start) and hold on
    /// to its [`recorder`](TraceSession::recorder).
    pub fn trace<R>(&self, f: impl FnOnce() -> R) -> Result<(R, TraceLog), TraceSetupError> {
        let session = self.start()?;
        let value = f();
        Ok((value, session.finish()))
    }
}

/// An open trace session. Dropping it ends the session.
#[derive(Debug)]
pub struct TraceSession<'t> {
    tracer: &'t RuntimeImportTracer,
    recorder: Arc<TraceRecorder>,
    released: bool,
}

impl TraceSession<'_> {
    /// Shared handle to this session's recorder. Stays readable after the
    /// session ends.
    pub fn recorder(&self) -> Arc<TraceRecorder> {
        Arc::clone(&self.recorder)
    }

    /// Events captured so far.
    pub fn snapshot(&self) -> TraceLog {
        self.recorder.snapshot()
    }

    /// End the session and return the full log.
    pub fn finish(mut self) -> TraceLog {
        self.release();
        let log = self.recorder.snapshot();
        info!(
            events = log.len(),
            reentrant = log.reentrant().count(),
            "import trace session finished"
        );
        log
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.tracer.hook.uninstall();
        self.tracer.active.store(false, Ordering::Release);
    }
}

impl Drop for TraceSession<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    struct RefusingHook;

    impl ImportHook for RefusingHook {
        fn install(&self, _observer: Arc<dyn ImportObserver>) -> Result<(), TraceSetupError> {
            Err(TraceSetupError::HookRejected {
                reason: "import hooks are disabled".to_string(),
            })
        }

        fn uninstall(&self) {}
    }

    #[test]
    fn nested_session_fails_fast() {
        let tracer = RuntimeImportTracer::new(ForwardingHook::new());
        let session = tracer.start().unwrap();
        assert_eq!(tracer.start().unwrap_err(), TraceSetupError::AlreadyActive);
        drop(session);
        assert!(tracer.start().is_ok());
    }

    #[test]
    fn refused_hook_is_an_error() {
        let tracer = RuntimeImportTracer::new(RefusingHook);
        assert!(matches!(
            tracer.start().unwrap_err(),
            TraceSetupError::HookRejected { .. }
        ));
        assert!(!tracer.is_active());
    }

    #[test]
    fn hook_is_removed_when_the_traced_code_panics() {
        let hook = ForwardingHook::new();
        let tracer = RuntimeImportTracer::new(hook.clone());
        let mut recorder = None;

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let session = tracer.start().unwrap();
            recorder = Some(session.recorder());
            hook.start("boom", None);
            panic!("module body raised");
        }));

        assert!(outcome.is_err());
        assert!(!hook.is_installed());
        assert!(!tracer.is_active());
        // captured events survive the failed session
        assert_eq!(recorder.unwrap().event_count(), 1);
    }

    #[test]
    fn panicking_trace_leaves_the_tracer_reusable() {
        let hook = ForwardingHook::new();
        let tracer = RuntimeImportTracer::new(hook.clone());

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _: Result<((), TraceLog), TraceSetupError> = tracer.trace(|| {
                hook.start("boom", None);
                panic!("module body raised");
            });
        }));
        assert!(outcome.is_err());
        assert!(!hook.is_installed());
        assert!(!tracer.is_active());

        let ((), log) = tracer
            .trace(|| {
                hook.start("ok", None);
                hook.end("ok");
            })
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.events[0].imported.as_str(), "ok");
    }

    #[test]
    fn events_after_finish_are_not_recorded() {
        let hook = ForwardingHook::new();
        let tracer = RuntimeImportTracer::new(hook.clone());
        let session = tracer.start().unwrap();
        let recorder = session.recorder();
        hook.start("a", None);
        hook.end("a");
        let log = session.finish();

        hook.start("late", None);
        assert_eq!(log.len(), 1);
        assert_eq!(recorder.event_count(), 1);
    }
}
