//! Native-image configuration artifacts.
//!
//! Each emitter renders the final [`NativeMetadata`] into one file of the native-image
//! configuration directory (see [`Settings::native_image_dir`]). Emitters never modify
//! the metadata; the defaults they rely on are registered beforehand through
//! [`register_default_includes`] and [`register_extension_classes`].

use crate::container::ClassLoader;
use crate::error::{Error, Result};
use crate::metadata::NativeMetadata;
use crate::serializer::{serialize_json, write_to_file};
use crate::settings::Settings;
use log::info;
use std::path::PathBuf;

pub const NATIVE_IMAGE_PROPERTIES: &str = "native-image.properties";
pub const RESOURCE_CONFIG: &str = "resource-config.json";
/// Concrete resource paths, read at runtime instead of scanning the image
pub const RESOURCE_MANIFEST: &str = "solon-resource.json";
pub const REFLECT_CONFIG: &str = "reflect-config.json";
pub const SERIALIZATION_CONFIG: &str = "serialization-config.json";

/// Resource patterns every application ships
pub const DEFAULT_RESOURCE_INCLUDES: [&str; 6] = [
    "app.*\\.yml",
    "app.*\\.properties",
    "META-INF/.*",
    "WEB-INF/.*",
    "static/.*",
    "templates/.*",
];

/// Framework extension points instantiated reflectively when present
pub const EXTENSION_CLASSES: [&str; 5] = [
    "org.noear.solon.extend.impl.PropsLoaderExt",
    "org.noear.solon.extend.impl.PropsConverterExt",
    "org.noear.solon.extend.impl.AppClassLoaderExt",
    "org.noear.solon.extend.impl.ReflectionExt",
    "org.noear.solon.extend.impl.ResourceScannerExt",
];

/// Registers [`DEFAULT_RESOURCE_INCLUDES`].
pub fn register_default_includes(metadata: &mut NativeMetadata) {
    for pattern in DEFAULT_RESOURCE_INCLUDES {
        metadata.register_resource_include(pattern);
    }
}

/// Registers the default constructor of every loadable [`EXTENSION_CLASSES`] entry.
pub fn register_extension_classes(metadata: &mut NativeMetadata, class_loader: &ClassLoader) {
    for class_name in EXTENSION_CLASSES {
        if class_loader.load_class(class_name) {
            metadata.register_default_constructor(class_name);
        }
    }
}

/// The native-image arguments, in the order they are written.
pub fn native_image_arguments(application_class_name: &str) -> Vec<String> {
    vec![
        format!("-H:Class={}", application_class_name),
        "--report-unsupported-elements-at-runtime".to_string(),
        "--no-fallback".to_string(),
        "--install-exit-handlers".to_string(),
    ]
}

/// What a full emission produced.
#[derive(Debug, Clone, Default)]
pub struct EmitSummary {
    /// Files written, in emission order
    pub files: Vec<PathBuf>,
    /// Number of concrete resources listed in the resource manifest
    pub resources: usize,
}

/// Writes the artifacts for one run.
pub struct ArtifactEmitter<'a> {
    settings: &'a Settings,
}

impl<'a> ArtifactEmitter<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Writes every artifact in order: native-image properties, resource config and
    /// manifest, reflect config, serialization config.
    ///
    /// # Errors
    ///
    /// Any write or pattern error aborts the emission.
    pub fn emit_all(&self, metadata: &NativeMetadata) -> Result<EmitSummary> {
        let mut summary = EmitSummary::default();

        summary.files.push(self.emit_native_image(metadata)?);

        let (files, resources) = self.emit_resource_config(metadata)?;
        summary.files.extend(files);
        summary.resources = resources;

        summary.files.push(self.emit_reflect_config(metadata)?);

        if let Some(file) = self.emit_serialization_config(metadata)? {
            summary.files.push(file);
        }
        Ok(summary)
    }

    /// `native-image.properties`
    pub fn emit_native_image(&self, metadata: &NativeMetadata) -> Result<PathBuf> {
        let application = metadata.application_class_name().ok_or_else(|| {
            Error::InvalidArgument("application class name was never set".to_string())
        })?;

        let content = format!(
            "Args = {}",
            native_image_arguments(application).join(" \\\n")
        );
        self.write(NATIVE_IMAGE_PROPERTIES, &content)
    }

    /// `solon-resource.json` and `resource-config.json`; returns both paths and the
    /// number of concrete resources found.
    pub fn emit_resource_config(&self, metadata: &NativeMetadata) -> Result<(Vec<PathBuf>, usize)> {
        // Artifacts of this or an earlier run are not application resources
        let own_dir = format!("{}/", self.settings.native_image_dir());
        let resources: Vec<String> = metadata
            .resources()
            .resolve(self.settings.class_output(), self.settings.resource_roots())?
            .into_iter()
            .filter(|path| !path.starts_with(&own_dir))
            .collect();
        info!("Found {} resources to include", resources.len());

        let manifest = self.write(RESOURCE_MANIFEST, &serialize_json(&resources)?)?;
        let config = self.write(RESOURCE_CONFIG, &metadata.to_resources_json()?)?;
        Ok((vec![manifest, config], resources.len()))
    }

    /// `reflect-config.json`, an empty array when nothing was registered
    pub fn emit_reflect_config(&self, metadata: &NativeMetadata) -> Result<PathBuf> {
        let json = metadata.to_reflection_json()?;
        let content = if json.is_empty() { "[]\n".to_string() } else { json };
        self.write(REFLECT_CONFIG, &content)
    }

    /// `serialization-config.json`, skipped when there are no entries
    pub fn emit_serialization_config(&self, metadata: &NativeMetadata) -> Result<Option<PathBuf>> {
        let json = metadata.to_serialization_json()?;
        if json.is_empty() {
            return Ok(None);
        }
        self.write(SERIALIZATION_CONFIG, &json).map(Some)
    }

    fn write(&self, config_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.settings.native_image_file(config_name);
        let existed = path.exists();
        write_to_file(content, &path)?;
        if !existed {
            info!("create file: {}", path.display());
        }
        Ok(path)
    }
}
