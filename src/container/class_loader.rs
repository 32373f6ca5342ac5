use crate::processor::BeanNativeProcessor;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Creates a fresh bean native processor for a run.
pub type ProcessorFactory = Arc<dyn Fn() -> Box<dyn BeanNativeProcessor> + Send + Sync>;

/// Records which classes the host application makes loadable by name.
///
/// The extractor never loads code itself. Instead the application declares, while it
/// starts, which well-known classes are present and which processor extensions it ships,
/// and the extractor asks by name.
#[derive(Clone, Default)]
pub struct ClassLoader {
    loadable: BTreeSet<String>,
    processors: HashMap<String, ProcessorFactory>,
}

impl ClassLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a class as loadable.
    pub fn define(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.loadable.insert(class_name.into());
        self
    }

    /// Registers a bean native processor implementation under its class name.
    pub fn define_processor(
        &mut self,
        class_name: impl Into<String>,
        factory: ProcessorFactory,
    ) -> &mut Self {
        let class_name = class_name.into();
        self.loadable.insert(class_name.clone());
        self.processors.insert(class_name, factory);
        self
    }

    pub fn load_class(&self, class_name: &str) -> bool {
        self.loadable.contains(class_name)
    }

    /// Instantiates the processor registered under `class_name`, if any.
    pub fn new_processor(&self, class_name: &str) -> Option<Box<dyn BeanNativeProcessor>> {
        self.processors.get(class_name).map(|factory| factory())
    }
}

impl std::fmt::Debug for ClassLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ClassLoader")
            .field("loadable", &self.loadable)
            .field("processors", &self.processors.keys().collect::<Vec<_>>())
            .finish()
    }
}
