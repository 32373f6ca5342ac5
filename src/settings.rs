use std::path::{Path, PathBuf};

/// Resource root categories that are physically scanned by default.
pub const DEFAULT_RESOURCE_ROOTS: [&str; 4] = ["META-INF", "static", "templates", "sql"];

/// Directory, relative to the class output, under which native-image picks up configuration.
const NATIVE_IMAGE_DIR: &str = "META-INF/native-image";

/// Configuration carried through a whole extraction run.
///
/// `Settings` is built once from the command line (or by an embedding host) and never
/// changes afterwards; every component reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    class_output: PathBuf,
    generated_sources: PathBuf,
    group_id: String,
    artifact_id: String,
    resource_roots: Vec<String>,
}

impl Settings {
    /// Creates settings with the default scannable resource roots.
    pub fn new(
        class_output: PathBuf,
        generated_sources: PathBuf,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Self {
        Self {
            class_output,
            generated_sources,
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            resource_roots: DEFAULT_RESOURCE_ROOTS.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Adds a user-declared resource root category that may be scanned.
    ///
    /// Adding a root that is already allowed has no effect.
    pub fn with_resource_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        if !self.resource_roots.contains(&root) {
            self.resource_roots.push(root);
        }
        self
    }

    /// Compiled classes and resources; doubles as the classpath root for resource scanning.
    pub fn class_output(&self) -> &Path {
        &self.class_output
    }

    pub fn generated_sources(&self) -> &Path {
        &self.generated_sources
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn resource_roots(&self) -> &[String] {
        &self.resource_roots
    }

    /// The native-image configuration directory, relative to the class output.
    ///
    /// Follows the `META-INF/native-image/<groupId>/<artifactId>` layout native-image
    /// scans on the classpath.
    pub fn native_image_dir(&self) -> String {
        format!("{}/{}/{}", NATIVE_IMAGE_DIR, self.group_id, self.artifact_id)
    }

    /// Absolute location of a configuration file inside the native-image directory.
    pub fn native_image_file(&self, config_name: &str) -> PathBuf {
        self.class_output
            .join(self.native_image_dir())
            .join(config_name)
    }
}
