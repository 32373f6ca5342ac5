//! Applications described in YAML.
//!
//! A descriptor lists what an application's container holds after startup, so the
//! extractor can process an application without linking against it:
//!
//! ```yaml
//! application: com.example.DemoApp
//! plugins: [com.example.web.WebPlugin]
//! loadable_classes: [org.noear.solon.extend.impl.ReflectionExt]
//! classes:
//!   - name: com.example.Bar
//!     fields:
//!       - { name: user, type: com.example.User }
//!     methods:
//!       - { name: setup }
//!   - name: com.example.User
//!     serializable: true
//! beans:
//!   - { class: com.example.Bar, proxied: true, init: setup }
//! methods:
//!   - { class: com.example.Config, name: dataSource, returns: javax.sql.DataSource }
//! registrars:
//!   - name: com.example.HintsRegistrar
//!     resources: ["static/.*"]
//!     serialization: [com.example.Event]
//!     constructors: [com.example.Reflective]
//!     methods:
//!       - { class: com.example.Reflective, name: describe, parameters: [], mode: introspect }
//! ```
//!
//! Bean and method classes missing from `classes` are treated as plain concrete classes.
//! A registrar method without `parameters` stands for every declared overload of that name.
//! Type references to classes declared `serializable` are marked serializable everywhere.

use crate::application::{AppContext, Application};
use crate::container::{BeanWrap, ClassInfo, Container, MethodDescriptor, RuntimeNativeRegistrar, TypeRef};
use crate::error::{Error, Result};
use crate::metadata::{ExecutableMode, NativeMetadata};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed application descriptor
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationDescriptor {
    pub application: String,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub loadable_classes: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassInfo>,
    #[serde(default)]
    pub beans: Vec<BeanDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub registrars: Vec<RegistrarDescriptor>,
}

/// A bean entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeanDescriptor {
    pub class: String,
    #[serde(default)]
    pub proxied: bool,
    /// Name of the init method
    #[serde(default)]
    pub init: Option<String>,
}

/// A registrar bean and the hints it contributes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarDescriptor {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub serialization: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<String>,
    #[serde(default)]
    pub methods: Vec<RegisteredMethod>,
}

/// A method a registrar keeps reflectively accessible
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisteredMethod {
    pub class: String,
    pub name: String,
    /// Parameter type names; when omitted every declared overload is kept
    #[serde(default)]
    pub parameters: Option<Vec<String>>,
    #[serde(default = "default_mode")]
    pub mode: ExecutableMode,
}

fn default_mode() -> ExecutableMode {
    ExecutableMode::Invoke
}

impl ApplicationDescriptor {
    /// Parses and validates a descriptor.
    ///
    /// `source` only names the descriptor in error messages.
    pub fn parse(yaml: &str, source: &Path) -> Result<Self> {
        let invalid = |message: String| Error::DescriptorError {
            file: source.to_path_buf(),
            message,
        };

        let mut descriptor: ApplicationDescriptor =
            serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;

        if descriptor.application.trim().is_empty() {
            return Err(invalid("application class name is empty".to_string()));
        }

        let mut names = HashSet::new();
        for class in &descriptor.classes {
            if !names.insert(class.name.as_str()) {
                return Err(invalid(format!("class {} is declared twice", class.name)));
            }
        }

        if let Some(method) = descriptor.methods.iter().find(|m| m.declaring_class.is_empty()) {
            return Err(invalid(format!("method {} has no class", method.name)));
        }

        descriptor.link();
        Ok(descriptor)
    }

    /// Fills in declaring classes and serializability of type references.
    fn link(&mut self) {
        let serializable: HashSet<String> = self
            .classes
            .iter()
            .filter(|c| c.serializable)
            .map(|c| c.name.clone())
            .collect();
        let mark = |type_ref: &mut TypeRef| {
            if serializable.contains(&type_ref.name) {
                type_ref.serializable = true;
            }
        };

        for class in &mut self.classes {
            for field in &mut class.fields {
                mark(&mut field.field_type);
            }
            for method in &mut class.methods {
                method.declaring_class = class.name.clone();
            }
        }

        let all_methods = self
            .classes
            .iter_mut()
            .flat_map(|c| c.methods.iter_mut())
            .chain(self.methods.iter_mut());
        for method in all_methods {
            method.parameters.iter_mut().for_each(mark);
            if let Some(returns) = method.returns.as_mut() {
                mark(returns);
            }
        }
    }

    fn class(&self, name: &str) -> ClassInfo {
        self.classes
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .unwrap_or_else(|| ClassInfo::new(name))
    }
}

/// An [`Application`] whose startup replays a descriptor into the context.
#[derive(Debug, Clone)]
pub struct DescriptorApplication {
    descriptor: ApplicationDescriptor,
    source: PathBuf,
}

impl DescriptorApplication {
    pub fn new(descriptor: ApplicationDescriptor, source: PathBuf) -> Self {
        Self { descriptor, source }
    }

    /// Reads and parses a descriptor file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| Error::DescriptorError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let descriptor = ApplicationDescriptor::parse(&yaml, path)?;
        Ok(Self::new(descriptor, path.to_path_buf()))
    }

    pub fn descriptor(&self) -> &ApplicationDescriptor {
        &self.descriptor
    }
}

impl Application for DescriptorApplication {
    fn class_name(&self) -> &str {
        &self.descriptor.application
    }

    fn main(&self, args: &[String], context: &mut AppContext) -> anyhow::Result<()> {
        info!(
            "Starting {} from {} with args {:?}",
            self.descriptor.application,
            self.source.display(),
            args
        );
        let descriptor = &self.descriptor;

        for class_name in &descriptor.loadable_classes {
            context.class_loader_mut().define(class_name.as_str());
        }
        for plugin in &descriptor.plugins {
            context.add_plugin(plugin.as_str());
        }

        let container = context.container_mut();
        for bean in &descriptor.beans {
            let class = descriptor.class(&bean.class);
            let init = bean.init.as_ref().map(|name| {
                class
                    .find_method(name)
                    .cloned()
                    .unwrap_or_else(|| MethodDescriptor::new(class.name.as_str(), name.as_str()))
            });

            let mut wrap = BeanWrap::new(class);
            if bean.proxied {
                wrap = wrap.with_proxy();
            }
            if let Some(init) = init {
                wrap = wrap.with_init_method(init);
            }
            container.register_bean(wrap);
        }

        for method in &descriptor.methods {
            container.register_method(method.clone());
        }

        for registrar in &descriptor.registrars {
            container.register_bean(BeanWrap::registrar(
                ClassInfo::new(registrar.name.as_str()),
                Arc::new(DescriptorRegistrar::new(registrar.clone(), descriptor)),
            ));
        }

        debug!(
            "Container holds {} beans, {} registrars",
            container.bean_count(),
            descriptor.registrars.len()
        );
        Ok(())
    }
}

/// Registrar contributing the hints listed in a [`RegistrarDescriptor`].
pub struct DescriptorRegistrar {
    registrar: RegistrarDescriptor,
    methods: Vec<(MethodDescriptor, ExecutableMode)>,
}

impl DescriptorRegistrar {
    fn new(registrar: RegistrarDescriptor, descriptor: &ApplicationDescriptor) -> Self {
        let methods = registrar
            .methods
            .iter()
            .flat_map(|r| {
                let declared: Vec<MethodDescriptor> = descriptor
                    .classes
                    .iter()
                    .filter(|c| c.name == r.class)
                    .flat_map(|c| c.methods.iter())
                    .filter(|m| m.name == r.name)
                    .filter(|m| {
                        r.parameters
                            .as_ref()
                            .map_or(true, |parameters| m.parameter_type_names() == *parameters)
                    })
                    .cloned()
                    .collect();

                let resolved = if declared.is_empty() {
                    let mut method = MethodDescriptor::new(r.class.as_str(), r.name.as_str());
                    method.parameters = r.parameters.iter().flatten().cloned().map(TypeRef::from).collect();
                    vec![method]
                } else {
                    declared
                };
                resolved.into_iter().map(move |method| (method, r.mode))
            })
            .collect();

        Self { registrar, methods }
    }
}

impl RuntimeNativeRegistrar for DescriptorRegistrar {
    fn register(&self, _container: &Container, metadata: &mut NativeMetadata) -> anyhow::Result<()> {
        debug!("Registrar {} contributing hints", self.registrar.name);
        for pattern in &self.registrar.resources {
            metadata.register_resource_include(pattern.as_str());
        }
        for class_name in &self.registrar.serialization {
            metadata.register_serialization(class_name);
        }
        for class_name in &self.registrar.constructors {
            metadata.register_default_constructor(class_name);
        }
        for (method, mode) in &self.methods {
            metadata.register_method(method, *mode);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AotContext;

    const DESCRIPTOR: &str = r#"
application: com.example.DemoApp
plugins: [com.example.web.WebPlugin]
loadable_classes: [org.noear.solon.extend.impl.ReflectionExt]
classes:
  - name: com.example.Bar
    fields:
      - { name: user, type: com.example.User }
    methods:
      - { name: setup }
  - name: com.example.User
    serializable: true
  - name: com.example.Api
    kind: interface
beans:
  - { class: com.example.Bar, proxied: true, init: setup }
  - { class: com.example.Api }
  - { class: com.example.Undeclared }
methods:
  - { class: com.example.Config, name: find, parameters: [long], returns: com.example.User }
registrars:
  - name: com.example.HintsRegistrar
    resources: ["static/.*"]
    methods:
      - { class: com.example.Bar, name: setup, mode: introspect }
"#;

    fn parse(yaml: &str) -> Result<ApplicationDescriptor> {
        ApplicationDescriptor::parse(yaml, Path::new("app.yaml"))
    }

    #[test]
    fn test_parse_links_serializable_types() {
        let descriptor = parse(DESCRIPTOR).unwrap();

        let bar = descriptor.class("com.example.Bar");
        assert!(bar.fields[0].field_type.serializable);
        assert_eq!(bar.methods[0].declaring_class, "com.example.Bar");

        let find = &descriptor.methods[0];
        assert!(find.returns.as_ref().unwrap().serializable);
        assert!(!find.parameters[0].serializable);
    }

    #[test]
    fn test_main_populates_context() {
        let application = DescriptorApplication::new(parse(DESCRIPTOR).unwrap(), PathBuf::from("app.yaml"));
        let mut context = AppContext::new(AotContext::new());

        application.main(&["--env=prod".to_string()], &mut context).unwrap();

        assert_eq!(application.class_name(), "com.example.DemoApp");
        assert_eq!(context.plugins(), &["com.example.web.WebPlugin"]);
        assert!(context.class_loader().load_class("org.noear.solon.extend.impl.ReflectionExt"));
        assert_eq!(context.container().bean_count(), 4);
        assert_eq!(context.container().registrars().len(), 1);

        let mut beans = Vec::new();
        context
            .container()
            .bean_foreach(|bean| {
                beans.push(bean.clone());
                Ok::<(), ()>(())
            })
            .unwrap();
        assert!(beans[0].is_proxied());
        assert_eq!(beans[0].init_method().unwrap().name, "setup");
        assert!(beans[1].class().is_interface());
        assert!(!beans[2].class().is_interface());
    }

    #[test]
    fn test_registrar_contributes_hints() {
        let application = DescriptorApplication::new(parse(DESCRIPTOR).unwrap(), PathBuf::from("app.yaml"));
        let mut context = AppContext::new(AotContext::new());
        application.main(&[], &mut context).unwrap();

        let mut metadata = NativeMetadata::new();
        for registrar in context.container().registrars() {
            registrar.register(context.container(), &mut metadata).unwrap();
        }

        assert_eq!(metadata.get_includes()[0].pattern(), "static/.*");
        let entry = metadata.reflection_entry("com.example.Bar").unwrap();
        assert_eq!(entry.method_mode("setup", &[]), Some(ExecutableMode::Introspect));
    }

    #[test]
    fn test_parse_rejects_invalid_descriptors() {
        assert!(matches!(
            parse("application: ''").unwrap_err(),
            Error::DescriptorError { .. }
        ));
        assert!(parse("application: a.B\nunknown: 1").is_err());
        assert!(parse("application: a.B\nclasses: [{name: a.C}, {name: a.C}]").is_err());
        assert!(parse("application: a.B\nmethods: [{name: orphan}]").is_err());
    }

    #[test]
    fn test_registrar_methods_match_overloads_by_parameters() {
        let yaml = r#"
application: a.App
classes:
  - name: a.Svc
    methods:
      - { name: run }
      - { name: run, parameters: [int] }
      - { name: stop }
      - { name: stop, parameters: [long] }
registrars:
  - name: a.Hints
    methods:
      - { class: a.Svc, name: run, parameters: [] }
      - { class: a.Svc, name: stop, mode: introspect }
      - { class: a.Svc, name: undeclared, parameters: [java.lang.String] }
"#;
        let application = DescriptorApplication::new(parse(yaml).unwrap(), PathBuf::from("app.yaml"));
        let mut context = AppContext::new(AotContext::new());
        application.main(&[], &mut context).unwrap();

        let mut metadata = NativeMetadata::new();
        for registrar in context.container().registrars() {
            registrar.register(context.container(), &mut metadata).unwrap();
        }

        let entry = metadata.reflection_entry("a.Svc").unwrap();
        assert_eq!(entry.method_mode("run", &[]), Some(ExecutableMode::Invoke));
        assert_eq!(entry.method_mode("run", &["int"]), None);
        assert_eq!(entry.method_mode("stop", &[]), Some(ExecutableMode::Introspect));
        assert_eq!(entry.method_mode("stop", &["long"]), Some(ExecutableMode::Introspect));
        assert_eq!(
            entry.method_mode("undeclared", &["java.lang.String"]),
            Some(ExecutableMode::Invoke)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_class_keys() {
        assert!(parse("application: a.B\nclasses: [{name: a.C, fianl: true}]").is_err());
        assert!(parse("application: a.B\nclasses: [{name: a.C, methods: [{name: run, statik: true}]}]").is_err());
        assert!(parse("application: a.B\nclasses: [{name: a.C, fields: [{name: id, typ: long}]}]").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = DescriptorApplication::from_file(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
