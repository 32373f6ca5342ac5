//! The application being processed.
//!
//! An [`Application`] is started once with an [`AppContext`] it fills in: beans and method
//! definitions in the container, loadable classes, plugins. The extractor then reads that
//! context. [`ApplicationCatalog`] resolves the application class name given on the command
//! line to an `Application`.

use crate::container::{ClassLoader, Container};
use crate::context::AotContext;
use crate::descriptor::DescriptorApplication;
use crate::error::{Error, Result};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// How an application should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopSignal {
    /// Wait for the application to finish stopping
    pub block: bool,
    /// Grace delay in milliseconds; negative stops without a grace period
    pub delay_ms: i64,
}

impl StopSignal {
    /// Non-blocking stop without grace period, so the extractor process can exit promptly.
    pub fn immediate() -> Self {
        Self {
            block: false,
            delay_ms: -1,
        }
    }
}

/// State an application builds while starting.
#[derive(Debug, Default)]
pub struct AppContext {
    container: Container,
    class_loader: ClassLoader,
    plugins: Vec<String>,
    aot: AotContext,
}

impl AppContext {
    pub fn new(aot: AotContext) -> Self {
        Self {
            aot,
            ..Self::default()
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn class_loader(&self) -> &ClassLoader {
        &self.class_loader
    }

    pub fn class_loader_mut(&mut self) -> &mut ClassLoader {
        &mut self.class_loader
    }

    /// Registers a plugin entry class; its default constructor is kept for native images.
    pub fn add_plugin(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.plugins.push(class_name.into());
        self
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Tells application code whether it is being started for AOT processing.
    pub fn aot(&self) -> &AotContext {
        &self.aot
    }
}

/// An application the extractor can start.
pub trait Application {
    /// Fully-qualified name of the application main class
    fn class_name(&self) -> &str;

    /// Starts the application, populating `context`.
    fn main(&self, args: &[String], context: &mut AppContext) -> anyhow::Result<()>;

    /// Stops the application. Called once the extraction finished or failed.
    fn stop(&self, _context: &mut AppContext, _signal: StopSignal) {}
}

/// Resolves application class names.
///
/// Registered applications are looked up by class name first. Otherwise, a name that is a
/// path to a YAML application descriptor loads a [`DescriptorApplication`].
#[derive(Default)]
pub struct ApplicationCatalog {
    applications: HashMap<String, Arc<dyn Application>>,
}

impl ApplicationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, application: Arc<dyn Application>) -> &mut Self {
        self.applications
            .insert(application.class_name().to_string(), application);
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::ApplicationNotFound`] for unknown names, or a descriptor error if the
    /// name points at an invalid descriptor.
    pub fn resolve(&self, class_name: &str) -> Result<Arc<dyn Application>> {
        if let Some(application) = self.applications.get(class_name) {
            return Ok(Arc::clone(application));
        }

        let path = Path::new(class_name);
        let is_descriptor = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_descriptor && path.is_file() {
            debug!("Loading application descriptor {}", path.display());
            return Ok(Arc::new(DescriptorApplication::from_file(path)?));
        }

        Err(Error::ApplicationNotFound(class_name.to_string()))
    }
}
