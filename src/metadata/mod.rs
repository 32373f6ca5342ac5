//! Native metadata accumulated during an extraction run.
//!
//! [`NativeMetadata`] collects reflection, resource and serialization hints and renders
//! them in the native-image configuration formats. It only ever grows: registering
//! something twice is a no-op, and a method registered for invocation is never downgraded
//! to introspection.
//!
//! Rendering is canonical. Reflection and serialization entries are sorted by class name
//! and member signature, so the same hints produce byte-identical JSON regardless of the
//! order they were registered in. Resource patterns keep registration order.

pub mod resources;

pub use resources::{PatternRegistry, ResourceHint};

use crate::container::MethodDescriptor;
use crate::error::{Error, Result};
use crate::serializer::serialize_json;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name native-image uses for constructors
const CONSTRUCTOR_NAME: &str = "<init>";

/// Reflective capability requested for a method.
///
/// Ordered by strength: `Invoke` implies `Introspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutableMode {
    /// The method can be discovered reflectively
    Introspect,
    /// The method can be invoked reflectively
    Invoke,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MethodKey {
    name: String,
    parameter_types: Vec<String>,
}

/// Reflection hints for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionEntry {
    all_public_constructors: bool,
    methods: BTreeMap<MethodKey, ExecutableMode>,
    fields: BTreeSet<String>,
}

impl ReflectionEntry {
    fn register_method(&mut self, key: MethodKey, mode: ExecutableMode) {
        let recorded = self.methods.entry(key).or_insert(mode);
        *recorded = (*recorded).max(mode);
    }

    fn merge(&mut self, other: ReflectionEntry) {
        self.all_public_constructors |= other.all_public_constructors;
        for (key, mode) in other.methods {
            self.register_method(key, mode);
        }
        self.fields.extend(other.fields);
    }

    pub fn has_default_constructor(&self) -> bool {
        self.methods.contains_key(&MethodKey {
            name: CONSTRUCTOR_NAME.to_string(),
            parameter_types: Vec::new(),
        })
    }

    pub fn has_all_public_constructors(&self) -> bool {
        self.all_public_constructors
    }

    /// Recorded mode for a method, by name and parameter type names
    pub fn method_mode(&self, name: &str, parameter_types: &[&str]) -> Option<ExecutableMode> {
        let key = MethodKey {
            name: name.to_string(),
            parameter_types: parameter_types.iter().map(|t| t.to_string()).collect(),
        };
        self.methods.get(&key).copied()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }
}

/// Accumulator for all hints of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeMetadata {
    application_class_name: Option<String>,
    reflection: BTreeMap<String, ReflectionEntry>,
    resources: PatternRegistry,
    serialization: BTreeSet<String>,
}

impl NativeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application main class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataConflict`] if a different name was already set.
    pub fn set_application_class_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        match &self.application_class_name {
            Some(existing) if *existing != name => Err(Error::MetadataConflict(format!(
                "application class already set to {}, refusing {}",
                existing, name
            ))),
            _ => {
                self.application_class_name = Some(name);
                Ok(())
            }
        }
    }

    pub fn application_class_name(&self) -> Option<&str> {
        self.application_class_name.as_deref()
    }

    fn entry(&mut self, class_name: &str) -> &mut ReflectionEntry {
        self.reflection.entry(class_name.to_string()).or_default()
    }

    /// Keeps the no-argument constructor of `class_name` invocable.
    pub fn register_default_constructor(&mut self, class_name: &str) -> &mut Self {
        self.entry(class_name).register_method(
            MethodKey {
                name: CONSTRUCTOR_NAME.to_string(),
                parameter_types: Vec::new(),
            },
            ExecutableMode::Invoke,
        );
        self
    }

    /// Keeps every public constructor of `class_name` invocable.
    pub fn register_public_constructors(&mut self, class_name: &str) -> &mut Self {
        self.entry(class_name).all_public_constructors = true;
        self
    }

    /// Records a method; a weaker mode never replaces a stronger one.
    pub fn register_method(&mut self, method: &MethodDescriptor, mode: ExecutableMode) -> &mut Self {
        let key = MethodKey {
            name: method.name.clone(),
            parameter_types: method.parameter_type_names(),
        };
        self.entry(&method.declaring_class).register_method(key, mode);
        self
    }

    pub fn register_field(&mut self, class_name: &str, field_name: &str) -> &mut Self {
        self.entry(class_name).fields.insert(field_name.to_string());
        self
    }

    pub fn register_serialization(&mut self, class_name: &str) -> &mut Self {
        self.serialization.insert(class_name.to_string());
        self
    }

    pub fn register_resource_include(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.resources.register_include(pattern);
        self
    }

    /// Folds the hints of `other` into `self` with the same rules as registering them here.
    ///
    /// The application class name of `other` is ignored.
    pub fn merge(&mut self, other: NativeMetadata) -> &mut Self {
        for (class_name, entry) in other.reflection {
            self.entry(&class_name).merge(entry);
        }
        for include in other.resources.includes() {
            self.resources.register_include(include.pattern());
        }
        self.serialization.extend(other.serialization);
        self
    }

    pub fn get_includes(&self) -> &[ResourceHint] {
        self.resources.includes()
    }

    pub fn resources(&self) -> &PatternRegistry {
        &self.resources
    }

    pub fn reflection_entry(&self, class_name: &str) -> Option<&ReflectionEntry> {
        self.reflection.get(class_name)
    }

    pub fn reflection_class_names(&self) -> impl Iterator<Item = &str> {
        self.reflection.keys().map(String::as_str)
    }

    pub fn serialization_class_names(&self) -> impl Iterator<Item = &str> {
        self.serialization.iter().map(String::as_str)
    }

    /// `reflect-config.json` content, or an empty string when there are no entries.
    pub fn to_reflection_json(&self) -> Result<String> {
        if self.reflection.is_empty() {
            return Ok(String::new());
        }

        let entries: Vec<ReflectConfigEntry> = self
            .reflection
            .iter()
            .map(|(name, entry)| ReflectConfigEntry::new(name, entry))
            .collect();
        serialize_json(&entries)
    }

    /// `resource-config.json` content, or an empty string when there are no patterns.
    pub fn to_resources_json(&self) -> Result<String> {
        if self.resources.is_empty() {
            return Ok(String::new());
        }

        serialize_json(&ResourceConfig {
            resources: ResourceIncludes {
                includes: self.resources.includes(),
            },
            bundles: Vec::new(),
        })
    }

    /// `serialization-config.json` content, or an empty string when there are no entries.
    pub fn to_serialization_json(&self) -> Result<String> {
        if self.serialization.is_empty() {
            return Ok(String::new());
        }

        let entries: Vec<NameConfig> = self
            .serialization
            .iter()
            .map(|name| NameConfig { name })
            .collect();
        serialize_json(&entries)
    }
}

#[derive(Serialize)]
struct ReflectConfigEntry<'a> {
    name: &'a str,
    #[serde(rename = "allPublicConstructors", skip_serializing_if = "is_false")]
    all_public_constructors: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    methods: Vec<MethodConfig<'a>>,
    #[serde(rename = "queriedMethods", skip_serializing_if = "Vec::is_empty")]
    queried_methods: Vec<MethodConfig<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<NameConfig<'a>>,
}

impl<'a> ReflectConfigEntry<'a> {
    fn new(name: &'a str, entry: &'a ReflectionEntry) -> Self {
        let mut methods = Vec::new();
        let mut queried_methods = Vec::new();
        for (key, mode) in &entry.methods {
            let config = MethodConfig {
                name: &key.name,
                parameter_types: &key.parameter_types,
            };
            match mode {
                ExecutableMode::Invoke => methods.push(config),
                ExecutableMode::Introspect => queried_methods.push(config),
            }
        }

        Self {
            name,
            all_public_constructors: entry.all_public_constructors,
            methods,
            queried_methods,
            fields: entry.fields.iter().map(|name| NameConfig { name }).collect(),
        }
    }
}

#[derive(Serialize)]
struct MethodConfig<'a> {
    name: &'a str,
    #[serde(rename = "parameterTypes")]
    parameter_types: &'a [String],
}

#[derive(Serialize)]
struct NameConfig<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ResourceConfig<'a> {
    resources: ResourceIncludes<'a>,
    bundles: Vec<NameConfig<'a>>,
}

#[derive(Serialize)]
struct ResourceIncludes<'a> {
    includes: &'a [ResourceHint],
}

fn is_false(value: &bool) -> bool {
    !*value
}
