use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resource scanner over a classpath root directory.
///
/// The `ResourceScanner` recursively walks one directory below the classpath root and
/// reports every file whose classpath-relative path satisfies a predicate. Paths always use
/// `/` as separator, the way resources are addressed at runtime.
///
/// # Example
///
/// ```no_run
/// use aot_native_metadata::scanner::ResourceScanner;
/// use std::path::PathBuf;
///
/// let scanner = ResourceScanner::new(PathBuf::from("target/classes"));
/// let result = scanner.scan("static", |path| path.ends_with(".html"));
/// println!("Found {} pages", result.resources.len());
/// ```
pub struct ResourceScanner {
    classpath: PathBuf,
}

/// Result of a resource scan.
pub struct ScanResult {
    /// Classpath-relative paths of matching files, unordered
    pub resources: HashSet<String>,
    /// Subtrees that could not be read and were skipped
    pub warnings: Vec<String>,
}

impl ResourceScanner {
    /// Creates a new `ResourceScanner` for the specified classpath root.
    pub fn new(classpath: PathBuf) -> Self {
        Self { classpath }
    }

    /// Scans `root_dir` (relative to the classpath root) and collects matching files.
    ///
    /// Unreadable entries, including a missing `root_dir`, are skipped and noted in
    /// [`ScanResult::warnings`]; scanning never fails.
    pub fn scan<P>(&self, root_dir: &str, predicate: P) -> ScanResult
    where
        P: Fn(&str) -> bool,
    {
        let mut resources = HashSet::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(self.classpath.join(root_dir)).follow_links(true) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let Some(relative) = self.relative_path(entry.path()) else {
                        continue;
                    };
                    if predicate(&relative) {
                        resources.insert(relative);
                    }
                }
                Err(e) => {
                    let warning = format!("Skipping unreadable resource path: {}", e);
                    debug!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        ScanResult {
            resources,
            warnings,
        }
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.classpath).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}
