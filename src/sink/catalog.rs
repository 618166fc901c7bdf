use super::{ConsoleSinkFactory, CoutSinkFactory, FileSinkFactory, SinkFactory};
use std::collections::HashMap;
use std::sync::Arc;

/// Sink factories by name.
#[derive(Clone, Default)]
pub struct SinkCatalog {
    factories: HashMap<String, Arc<dyn SinkFactory>>,
}

impl SinkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with `stdout`, `file` and `cout` registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register("stdout", ConsoleSinkFactory::default());
        catalog.register("file", FileSinkFactory);
        catalog.register("cout", CoutSinkFactory::default());
        catalog
    }

    /// Registers (or replaces) the factory for `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: impl SinkFactory + 'static) {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SinkFactory>> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
