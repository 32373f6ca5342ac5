//! Proxy class source generation.
//!
//! Beans intercepted at runtime need their proxy subclass compiled ahead of time. For a
//! target `com.example.Bar` the generator writes `com/example/Bar$$SolonAopProxy.java`
//! below the generated sources directory. The proxy extends the target and routes every
//! overridable method through a `java.lang.reflect.InvocationHandler`.

use crate::container::{ClassInfo, MethodDescriptor, TypeRef, Visibility};
use crate::error::{Error, Result};
use crate::serializer::write_to_file;
use crate::settings::Settings;
use log::{debug, info};
use std::collections::HashSet;
use std::path::PathBuf;

/// Appended to the target class name to form the proxy class name
pub const PROXY_CLASS_SUFFIX: &str = "$$SolonAopProxy";

/// Fully-qualified proxy class name for a target class.
pub fn proxy_class_name(target_class: &str) -> String {
    format!("{}{}", target_class, PROXY_CLASS_SUFFIX)
}

/// Writes proxy sources for intercepted beans.
#[derive(Debug, Default)]
pub struct ProxyClassGenerator;

impl ProxyClassGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Location of the generated source for `target`.
    pub fn source_path(settings: &Settings, target: &ClassInfo) -> PathBuf {
        let mut path = settings.generated_sources().to_path_buf();
        if !target.package_name().is_empty() {
            path.extend(target.package_name().split('.'));
        }
        path.join(format!("{}{}.java", target.simple_name(), PROXY_CLASS_SUFFIX))
    }

    /// Generates and writes the proxy source for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProxyError`] if the target cannot be subclassed (interfaces, final
    /// classes, malformed names) and [`Error::WriteError`] if the source cannot be written.
    pub fn generate_code(&self, settings: &Settings, target: &ClassInfo) -> Result<()> {
        Self::check_target(target)?;

        let source = Self::render(target);
        let path = Self::source_path(settings, target);
        write_to_file(&source, &path)?;

        info!("Generated proxy {} for {}", path.display(), target.name);
        Ok(())
    }

    fn check_target(target: &ClassInfo) -> Result<()> {
        let reject = |message: &str| Error::ProxyError {
            class_name: target.name.clone(),
            message: message.to_string(),
        };

        if !target.name.split('.').all(is_identifier) {
            return Err(reject("class name is not a valid fully-qualified name"));
        }
        if TypeRef::new(target.name.as_str()).is_primitive() {
            return Err(reject("primitive types cannot be subclassed"));
        }
        if target.is_interface() {
            return Err(reject("interfaces cannot be subclassed"));
        }
        if target.is_final {
            return Err(reject("final classes cannot be subclassed"));
        }
        Ok(())
    }

    fn render(target: &ClassInfo) -> String {
        let proxy_name = format!("{}{}", target.simple_name(), PROXY_CLASS_SUFFIX);
        let mut out = String::new();

        if !target.package_name().is_empty() {
            out.push_str(&format!("package {};\n\n", target.package_name()));
        }
        out.push_str("import java.lang.reflect.InvocationHandler;\n");
        out.push_str("import java.lang.reflect.Method;\n");
        out.push_str("import java.lang.reflect.UndeclaredThrowableException;\n\n");
        out.push_str(&format!(
            "public class {} extends {} {{\n",
            proxy_name,
            target.simple_name()
        ));
        out.push_str("    private final InvocationHandler handler;\n\n");
        out.push_str(&format!(
            "    public {}(InvocationHandler handler) {{\n        super();\n        this.handler = handler;\n    }}\n",
            proxy_name
        ));

        let mut seen = HashSet::new();
        for method in target.methods.iter().filter(|m| m.is_overridable()) {
            if !seen.insert(method.signature()) {
                continue;
            }
            debug!("Proxying {}.{}", target.name, method.signature());
            out.push('\n');
            out.push_str(&Self::render_method(target, method));
        }

        out.push_str("}\n");
        out
    }

    fn render_method(target: &ClassInfo, method: &MethodDescriptor) -> String {
        let visibility = match method.visibility {
            Visibility::Public => "public ",
            Visibility::Protected => "protected ",
            _ => "",
        };
        let return_type = method
            .returns
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or("void");
        let return_cast = method.returns.as_ref().map(TypeRef::erasure).unwrap_or("void");
        let parameters: Vec<String> = method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} p{}", p.name, i))
            .collect();
        let mut lookup_args = vec![format!("\"{}\"", method.name)];
        lookup_args.extend(method.parameters.iter().map(|p| format!("{}.class", p.erasure())));
        let call_args: Vec<String> = (0..method.parameters.len()).map(|i| format!("p{}", i)).collect();

        let invoke = format!(
            "handler.invoke(this, method, new Object[]{{{}}})",
            call_args.join(", ")
        );
        let body = if return_type == "void" {
            format!("{};", invoke)
        } else {
            format!("return ({}) {};", return_cast, invoke)
        };

        format!(
            "    @Override\n    {}{} {}({}) {{\n        try {{\n            Method method = {}.class.getDeclaredMethod({});\n            {}\n        }} catch (RuntimeException | Error e) {{\n            throw e;\n        }} catch (Throwable e) {{\n            throw new UndeclaredThrowableException(e);\n        }}\n    }}\n",
            visibility,
            return_type,
            method.name,
            parameters.join(", "),
            target.name,
            lookup_args.join(", "),
            body
        )
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(temp_dir: &TempDir) -> Settings {
        Settings::new(
            temp_dir.path().join("classes"),
            temp_dir.path().join("generated"),
            "com.example",
            "demo",
        )
    }

    fn bar() -> ClassInfo {
        ClassInfo::new("com.example.Bar")
            .with_method(MethodDescriptor::new("", "setup"))
            .with_method(
                MethodDescriptor::new("", "greet")
                    .with_parameter(TypeRef::new("java.lang.String"))
                    .with_return(TypeRef::new("java.lang.String")),
            )
            .with_method(MethodDescriptor::new("", "secret").with_visibility(Visibility::Private))
    }

    #[test]
    fn test_proxy_class_name() {
        assert_eq!(proxy_class_name("com.example.Bar"), "com.example.Bar$$SolonAopProxy");
    }

    #[test]
    fn test_generate_code_writes_source() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);

        ProxyClassGenerator::new().generate_code(&settings, &bar()).unwrap();

        let path = temp_dir
            .path()
            .join("generated/com/example/Bar$$SolonAopProxy.java");
        let source = fs::read_to_string(path).unwrap();

        assert!(source.starts_with("package com.example;\n"));
        assert!(source.contains("public class Bar$$SolonAopProxy extends Bar {"));
        assert!(source.contains("public void setup() {"));
        assert!(source.contains("public java.lang.String greet(java.lang.String p0) {"));
        assert!(source.contains(
            "Method method = com.example.Bar.class.getDeclaredMethod(\"greet\", java.lang.String.class);"
        ));
        assert!(source.contains("return (java.lang.String) handler.invoke(this, method, new Object[]{p0});"));
        assert!(!source.contains("secret"));
    }

    #[test]
    fn test_generic_types_are_erased_in_literals() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let repo = ClassInfo::new("com.example.Repo").with_method(
            MethodDescriptor::new("", "save")
                .with_parameter(TypeRef::new("java.util.List<java.lang.String>"))
                .with_return(TypeRef::new("java.util.Map<java.lang.String, java.lang.Long>")),
        );

        ProxyClassGenerator::new().generate_code(&settings, &repo).unwrap();

        let source = fs::read_to_string(ProxyClassGenerator::source_path(&settings, &repo)).unwrap();
        assert!(source.contains(
            "public java.util.Map<java.lang.String, java.lang.Long> save(java.util.List<java.lang.String> p0) {"
        ));
        assert!(source.contains("getDeclaredMethod(\"save\", java.util.List.class);"));
        assert!(source.contains("return (java.util.Map) handler.invoke(this, method, new Object[]{p0});"));
        assert!(!source.contains(">.class"));
    }

    #[test]
    fn test_generate_code_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let generator = ProxyClassGenerator::new();
        let path = ProxyClassGenerator::source_path(&settings, &bar());

        generator.generate_code(&settings, &bar()).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        generator.generate_code(&settings, &bar()).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_default_package() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);

        ProxyClassGenerator::new()
            .generate_code(&settings, &ClassInfo::new("Bare"))
            .unwrap();

        let source = fs::read_to_string(temp_dir.path().join("generated/Bare$$SolonAopProxy.java")).unwrap();
        assert!(source.starts_with("import "));
    }

    #[test]
    fn test_rejects_interface_and_final() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let generator = ProxyClassGenerator::new();

        let err = generator
            .generate_code(&settings, &ClassInfo::interface("com.example.Api"))
            .unwrap_err();
        assert!(matches!(err, Error::ProxyError { .. }));

        let mut sealed = ClassInfo::new("com.example.Sealed");
        sealed.is_final = true;
        assert!(generator.generate_code(&settings, &sealed).is_err());

        assert!(generator
            .generate_code(&settings, &ClassInfo::new("com.example.9Bad"))
            .is_err());
        assert!(generator.generate_code(&settings, &ClassInfo::new("int")).is_err());
        assert!(generator.generate_code(&settings, &ClassInfo::new("int[]")).is_err());
        assert!(!temp_dir.path().join("generated").exists());
    }
}
