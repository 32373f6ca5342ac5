use crate::aot_processor::{AotProcessor, ProcessSummary};
use crate::application::ApplicationCatalog;
use crate::settings::Settings;
use anyhow::Result;
use clap::Parser;
use log::{debug, error, info};
use std::path::PathBuf;

/// AOT native metadata extractor - Generate native-image configuration from a live application
#[derive(Parser, Debug)]
#[command(name = "aot-native-metadata")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Application main class, or path to a YAML application descriptor
    #[arg(value_name = "APPLICATION_CLASS")]
    pub application_class: String,

    /// Class output directory; configuration is written below it
    #[arg(value_name = "CLASS_OUTPUT")]
    pub class_output: PathBuf,

    /// Directory for generated proxy sources
    #[arg(value_name = "GENERATED_SOURCES")]
    pub generated_sources: PathBuf,

    /// Project group id
    #[arg(value_name = "GROUP_ID")]
    pub group_id: String,

    /// Project artifact id
    #[arg(value_name = "ARTIFACT_ID")]
    pub artifact_id: String,

    /// Arguments forwarded verbatim to the application
    #[arg(value_name = "APP_ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub application_args: Vec<String>,

    /// Additional resource root to scan (repeatable)
    #[arg(short = 'r', long = "resource-root", value_name = "ROOT")]
    pub resource_roots: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Settings for the run described by these arguments
    pub fn settings(&self) -> Settings {
        self.resource_roots.iter().fold(
            Settings::new(
                self.class_output.clone(),
                self.generated_sources.clone(),
                self.group_id.clone(),
                self.artifact_id.clone(),
            ),
            |settings, root| settings.with_resource_root(root.clone()),
        )
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.application_class.trim().is_empty() {
        anyhow::bail!("Application class must not be empty");
    }

    for (name, value) in [("Group id", &args.group_id), ("Artifact id", &args.artifact_id)] {
        if value.trim().is_empty() {
            anyhow::bail!("{} must not be empty", name);
        }
        if value.contains('/') || value.contains('\\') || value == ".." {
            anyhow::bail!("{} must not contain path separators: {}", name, value);
        }
    }

    if args.class_output.is_file() {
        anyhow::bail!(
            "Class output path is not a directory: {}",
            args.class_output.display()
        );
    }

    info!("Application: {}", args.application_class);
    info!("Class output: {}", args.class_output.display());
    info!("Generated sources: {}", args.generated_sources.display());
    info!("Coordinates: {}:{}", args.group_id, args.artifact_id);
    if !args.application_args.is_empty() {
        info!("Application args: {:?}", args.application_args);
    }

    Ok(args)
}

/// Run the extraction for an application known to `catalog`
pub fn run_with_catalog(args: CliArgs, catalog: &ApplicationCatalog) -> Result<ProcessSummary> {
    let settings = args.settings();
    let application = catalog.resolve(&args.application_class).map_err(|e| {
        error!("aot processor: {}", e);
        e
    })?;

    info!("Starting AOT processing of {}...", application.class_name());
    let processor = AotProcessor::new(settings, args.application_args, application);
    let summary = processor.process()?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Beans processed: {}", summary.beans_processed);
    info!("  - Resources found: {}", summary.resources);
    for file in &summary.files {
        info!("  - Wrote {}", file.display());
    }

    Ok(summary)
}

/// Run the main workflow; applications are resolved from descriptor files
pub fn run(args: CliArgs) -> Result<ProcessSummary> {
    run_with_catalog(args, &ApplicationCatalog::new())
}
