use crate::error::{Error, Result};
use crate::scanner::ResourceScanner;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// A resource inclusion pattern, a regular expression over classpath-relative paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceHint {
    pattern: String,
}

impl ResourceHint {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Ordered set of resource inclusion patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternRegistry {
    includes: Vec<ResourceHint>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern unless an identical one is already registered.
    pub fn register_include(&mut self, pattern: impl Into<String>) -> &mut Self {
        let hint = ResourceHint::new(pattern);
        if !self.includes.contains(&hint) {
            self.includes.push(hint);
        }
        self
    }

    /// Registered patterns in registration order
    pub fn includes(&self) -> &[ResourceHint] {
        &self.includes
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    /// Expands the patterns into concrete classpath resources.
    ///
    /// Only patterns starting with one of `allowed_roots` are scanned, and only below that
    /// root; anything else describes paths that cannot be enumerated at build time. A
    /// pattern matches a path if it matches anywhere in it.
    ///
    /// Returns the sorted, deduplicated union of all matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternError`] if a scanned pattern is not a valid regular expression.
    pub fn resolve(&self, classpath: &Path, allowed_roots: &[String]) -> Result<Vec<String>> {
        let scanner = ResourceScanner::new(classpath.to_path_buf());
        let mut resources = BTreeSet::new();

        for include in &self.includes {
            for root in allowed_roots {
                if !include.pattern.starts_with(root.as_str()) {
                    continue;
                }

                let regex = Regex::new(&include.pattern).map_err(|e| Error::PatternError {
                    pattern: include.pattern.clone(),
                    message: e.to_string(),
                })?;

                let result = scanner.scan(root, |path| regex.is_match(path));
                debug!(
                    "Pattern '{}' matched {} resources under {}",
                    include.pattern,
                    result.resources.len(),
                    root
                );
                for warning in &result.warnings {
                    warn!("{}", warning);
                }
                resources.extend(result.resources);
            }
        }

        Ok(resources.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn roots() -> Vec<String> {
        ["META-INF", "static", "templates", "sql"]
            .iter()
            .map(|r| r.to_string())
            .collect()
    }

    fn create_classpath(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "x").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_register_include_deduplicates_and_keeps_order() {
        let mut registry = PatternRegistry::new();
        registry
            .register_include("static/.*")
            .register_include("app.*\\.yml")
            .register_include("static/.*");

        let patterns: Vec<&str> = registry.includes().iter().map(|h| h.pattern()).collect();
        assert_eq!(patterns, vec!["static/.*", "app.*\\.yml"]);
    }

    #[test]
    fn test_resolve_scans_allowed_roots_only() {
        let temp_dir = create_classpath(&[
            "static/index.html",
            "templates/home.ftl",
            "app.yml",
            "WEB-INF/web.xml",
        ]);

        let mut registry = PatternRegistry::new();
        registry
            .register_include("app.*\\.yml")
            .register_include("WEB-INF/.*")
            .register_include("static/.*");

        let resolved = registry.resolve(temp_dir.path(), &roots()).unwrap();

        assert_eq!(resolved, vec!["static/index.html"]);
    }

    #[test]
    fn test_resolve_uses_unanchored_match() {
        let temp_dir = create_classpath(&["sql/init/schema.sql", "sql/readme.txt"]);

        let mut registry = PatternRegistry::new();
        registry.register_include("sql.*schema");

        let resolved = registry.resolve(temp_dir.path(), &roots()).unwrap();

        assert_eq!(resolved, vec!["sql/init/schema.sql"]);
    }

    #[test]
    fn test_resolve_is_sorted_and_deduplicated() {
        let temp_dir = create_classpath(&["static/b.js", "static/a.js"]);

        let mut registry = PatternRegistry::new();
        registry
            .register_include("static/.*")
            .register_include("static/.*\\.js");

        let resolved = registry.resolve(temp_dir.path(), &roots()).unwrap();

        assert_eq!(resolved, vec!["static/a.js", "static/b.js"]);
    }

    #[test]
    fn test_resolve_rejects_invalid_pattern() {
        let temp_dir = create_classpath(&[]);

        let mut registry = PatternRegistry::new();
        registry.register_include("static/(unclosed");

        let err = registry.resolve(temp_dir.path(), &roots()).unwrap_err();
        assert!(matches!(err, Error::PatternError { .. }));
    }

    #[test]
    fn test_resolve_ignores_invalid_pattern_outside_roots() {
        let temp_dir = create_classpath(&[]);

        let mut registry = PatternRegistry::new();
        registry.register_include("dynamic/(unclosed");

        assert!(registry.resolve(temp_dir.path(), &roots()).unwrap().is_empty());
    }
}
