//! Processor registration: the set of processor types eligible for dispatch.
//!
//! There is no runtime type discovery. Modules register factories at
//! startup and the dispatcher takes a snapshot per dispatch. Installing and
//! hinting are append-only and safe against concurrent resolves.

use std::any::type_name;
use std::sync::RwLock;

use crate::processor::Processor;

type Factory<U> = fn() -> Box<dyn Processor<U>>;

/// One registered processor type: display name plus instantiation function.
pub struct ProcessorEntry<U> {
    name: &'static str,
    factory: Factory<U>,
}

impl<U> Clone for ProcessorEntry<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for ProcessorEntry<U> {}

impl<U> ProcessorEntry<U> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Create the fresh instance used for exactly one dispatch.
    pub fn instantiate(&self) -> Box<dyn Processor<U>> {
        (self.factory)()
    }
}

/// A named, ordered group of processor types — the discovery unit a
/// collaborator hands to the registry.
pub struct ProcessorModule<U> {
    name: &'static str,
    entries: Vec<ProcessorEntry<U>>,
}

impl<U> ProcessorModule<U> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Add a concrete processor type, instantiated via `Default` once per
    /// dispatch.
    pub fn with<P>(mut self) -> Self
    where
        P: Processor<U> + Default + 'static,
    {
        self.entries.push(ProcessorEntry {
            name: type_name::<P>(),
            factory: || Box::new(P::default()),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &[ProcessorEntry<U>] {
        &self.entries
    }
}

/// Process-wide set of processor types considered for dispatch.
///
/// Populated during startup, read on every dispatch. Once any module has
/// been hinted, only hinted modules are resolved; otherwise resolution
/// falls back to everything installed. Both collections are append-only,
/// and resolution order is deterministic for a fixed registration.
pub struct HandlerRegistry<U> {
    installed: RwLock<Vec<ProcessorModule<U>>>,
    hinted: RwLock<Vec<ProcessorModule<U>>>,
}

impl<U> Default for HandlerRegistry<U> {
    fn default() -> Self {
        Self {
            installed: RwLock::new(Vec::new()),
            hinted: RwLock::new(Vec::new()),
        }
    }
}

impl<U> HandlerRegistry<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a module's processor types known to the program.
    pub fn install(&self, module: ProcessorModule<U>) {
        tracing::debug!(
            module = module.name(),
            processors = module.entries().len(),
            "installing processor module"
        );
        self.installed
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(module);
    }

    /// Restrict dispatch to hinted modules.
    ///
    /// Hinting is expected during startup only, but appending while another
    /// thread resolves is safe.
    pub fn hint(&self, module: ProcessorModule<U>) {
        tracing::debug!(module = module.name(), "hinting processor module");
        self.hinted
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(module);
    }

    /// Snapshot of the processor types for the next dispatch, in
    /// registration order.
    pub fn resolve(&self) -> Vec<ProcessorEntry<U>> {
        let hinted = self
            .hinted
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let source = if hinted.is_empty() {
            drop(hinted);
            self.installed
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        } else {
            hinted
        };

        source
            .iter()
            .flat_map(|module| module.entries().iter().copied())
            .collect()
    }
}
