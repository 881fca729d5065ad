use std::sync::Arc;

use parking_lot::RwLock;

use super::{ImportHook, ImportObserver};
use crate::TraceSetupError;

/// Hook for hosts that deliver load notifications themselves.
///
/// The host keeps a clone and calls [`ForwardingHook::start`] and
/// [`ForwardingHook::end`] from its own loader; they reach the observer of
/// whatever session is installed and are dropped otherwise. Only one
/// observer can be installed at a time.
#[derive(Clone, Default)]
pub struct ForwardingHook {
    observer: Arc<RwLock<Option<Arc<dyn ImportObserver>>>>,
}

impl std::fmt::Debug for ForwardingHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingHook")
            .field("installed", &self.is_installed())
            .finish()
    }
}

impl ForwardingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.observer.read().is_some()
    }

    pub fn start(&self, module: &str, importer: Option<&str>) {
        if let Some(observer) = self.observer.read().as_ref() {
            observer.on_import_start(module, importer);
        }
    }

    pub fn end(&self, module: &str) {
        if let Some(observer) = self.observer.read().as_ref() {
            observer.on_import_end(module);
        }
    }
}

impl ImportHook for ForwardingHook {
    fn install(&self, observer: Arc<dyn ImportObserver>) -> Result<(), TraceSetupError> {
        let mut slot = self.observer.write();
        if slot.is_some() {
            return Err(TraceSetupError::HookRejected {
                reason: "an observer is already registered on this hook".to_string(),
            });
        }
        *slot = Some(observer);
        Ok(())
    }

    fn uninstall(&self) {
        self.observer.write().take();
    }
}
