use crate::application::{AppContext, Application, StopSignal};
use crate::context::AotContext;
use crate::emitter::{register_default_includes, register_extension_classes, ArtifactEmitter};
use crate::metadata::NativeMetadata;
use crate::processor::{select_processor, BeanProcessor};
use crate::proxy::ProxyClassGenerator;
use crate::settings::Settings;
use anyhow::{Context, Result};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of a successful extraction run
#[derive(Debug, Clone)]
pub struct ProcessSummary {
    /// Beans hints were derived for
    pub beans_processed: usize,
    /// Concrete resources listed in the resource manifest
    pub resources: usize,
    /// Artifacts written, in emission order
    pub files: Vec<PathBuf>,
}

/// Runs one extraction: starts the application, walks its container and writes the
/// native-image configuration.
///
/// The AOT marker handed to the application is set for the whole run and cleared on every
/// exit path. The application is stopped once the run finishes, whether it succeeded or not.
pub struct AotProcessor {
    settings: Settings,
    application_args: Vec<String>,
    application: Arc<dyn Application>,
    proxy_generator: ProxyClassGenerator,
    aot: AotContext,
}

impl AotProcessor {
    pub fn new(settings: Settings, application_args: Vec<String>, application: Arc<dyn Application>) -> Self {
        Self {
            settings,
            application_args,
            application,
            proxy_generator: ProxyClassGenerator::new(),
            aot: AotContext::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The marker shared with the application
    pub fn aot_context(&self) -> &AotContext {
        &self.aot
    }

    pub fn process(&self) -> Result<ProcessSummary> {
        let _guard = self.aot.enter();
        let mut context = AppContext::new(self.aot.clone());

        let result = self.do_process(&mut context);
        if let Err(e) = &result {
            error!("aot processor failed: {:#}", e);
        }

        self.application.stop(&mut context, StopSignal::immediate());
        result
    }

    fn do_process(&self, context: &mut AppContext) -> Result<ProcessSummary> {
        if let Err(e) = self.application.main(&self.application_args, context) {
            error!(
                "aot processor: application {} failed to start, processing the container as is: {:#}",
                self.application.class_name(),
                e
            );
        }

        let processor = select_processor(context.class_loader());

        let mut metadata = NativeMetadata::new();
        metadata.set_application_class_name(self.application.class_name())?;

        let beans_processed = BeanProcessor::new(&self.settings, processor.as_ref(), &self.proxy_generator)
            .process(context.container(), &mut metadata)
            .context("Failed to process beans")?;

        for plugin in context.plugins() {
            metadata.register_default_constructor(plugin);
        }

        for registrar in context.container().registrars() {
            registrar
                .register(context.container(), &mut metadata)
                .context("Native registrar failed")?;
        }

        register_default_includes(&mut metadata);
        register_extension_classes(&mut metadata, context.class_loader());

        let summary = ArtifactEmitter::new(&self.settings)
            .emit_all(&metadata)
            .context("Failed to write native-image configuration")?;

        info!("aot processor end.");
        Ok(ProcessSummary {
            beans_processed,
            resources: summary.resources,
            files: summary.files,
        })
    }
}
