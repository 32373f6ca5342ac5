//! Read-only model of the dependency-injection container the extractor walks.
//!
//! The host application populates a [`Container`] while it starts: every managed bean as a
//! [`BeanWrap`] and every method definition the container invokes reflectively (factory
//! methods, request mappings and the like) as a [`MethodDescriptor`]. Once the application
//! has started, the extractor only enumerates it.

pub mod class;
pub mod class_loader;

pub use class::{ClassInfo, ClassKind, FieldInfo, MethodDescriptor, TypeRef, Visibility};
pub use class_loader::{ClassLoader, ProcessorFactory};

use crate::metadata::NativeMetadata;
use std::sync::Arc;

/// Contributes hints of its own after the bean graph has been processed.
///
/// Registrars are beans themselves; the bean processor never derives hints for them.
pub trait RuntimeNativeRegistrar {
    fn register(&self, container: &Container, metadata: &mut NativeMetadata) -> anyhow::Result<()>;
}

/// A bean managed by the container.
#[derive(Clone)]
pub struct BeanWrap {
    class: ClassInfo,
    proxied: bool,
    init_method: Option<MethodDescriptor>,
    registrar: Option<Arc<dyn RuntimeNativeRegistrar>>,
}

impl BeanWrap {
    pub fn new(class: ClassInfo) -> Self {
        Self {
            class,
            proxied: false,
            init_method: None,
            registrar: None,
        }
    }

    /// A bean whose runtime type is a metadata registrar.
    pub fn registrar(class: ClassInfo, registrar: Arc<dyn RuntimeNativeRegistrar>) -> Self {
        Self {
            registrar: Some(registrar),
            ..Self::new(class)
        }
    }

    /// Marks the bean as intercepted through a dynamic proxy.
    pub fn with_proxy(mut self) -> Self {
        self.proxied = true;
        self
    }

    /// Sets the init method; an unset owning class becomes the bean class.
    pub fn with_init_method(mut self, mut method: MethodDescriptor) -> Self {
        if method.declaring_class.is_empty() {
            method.declaring_class = self.class.name.clone();
        }
        self.init_method = Some(method);
        self
    }

    pub fn class(&self) -> &ClassInfo {
        &self.class
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    pub fn init_method(&self) -> Option<&MethodDescriptor> {
        self.init_method.as_ref()
    }

    pub fn is_registrar(&self) -> bool {
        self.registrar.is_some()
    }
}

impl std::fmt::Debug for BeanWrap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("BeanWrap")
            .field("class", &self.class.name)
            .field("proxied", &self.proxied)
            .field("init_method", &self.init_method.as_ref().map(|m| m.signature()))
            .field("registrar", &self.is_registrar())
            .finish()
    }
}

/// Registry of beans and method definitions, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Container {
    beans: Vec<BeanWrap>,
    methods: Vec<MethodDescriptor>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_bean(&mut self, bean: BeanWrap) -> &mut Self {
        self.beans.push(bean);
        self
    }

    pub fn register_method(&mut self, method: MethodDescriptor) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn bean_count(&self) -> usize {
        self.beans.len()
    }

    /// Visits every bean, stopping at the first error the visitor returns.
    pub fn bean_foreach<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&BeanWrap) -> Result<(), E>,
    {
        self.beans.iter().try_for_each(|bean| visitor(bean))
    }

    /// Visits every method definition.
    pub fn method_foreach<F>(&self, visitor: F)
    where
        F: FnMut(&MethodDescriptor),
    {
        self.methods.iter().for_each(visitor);
    }

    /// All beans implementing [`RuntimeNativeRegistrar`], in registration order.
    pub fn registrars(&self) -> Vec<Arc<dyn RuntimeNativeRegistrar>> {
        self.beans
            .iter()
            .filter_map(|bean| bean.registrar.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopRegistrar;

    impl RuntimeNativeRegistrar for NoopRegistrar {
        fn register(&self, _container: &Container, _metadata: &mut NativeMetadata) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bean_foreach_visits_in_order() {
        let mut container = Container::new();
        container
            .register_bean(BeanWrap::new(ClassInfo::new("com.example.A")))
            .register_bean(BeanWrap::new(ClassInfo::new("com.example.B")));

        let mut seen = Vec::new();
        container
            .bean_foreach(|bean| {
                seen.push(bean.class().name.clone());
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(seen, vec!["com.example.A", "com.example.B"]);
    }

    #[test]
    fn test_bean_foreach_stops_on_error() {
        let mut container = Container::new();
        container
            .register_bean(BeanWrap::new(ClassInfo::new("com.example.A")))
            .register_bean(BeanWrap::new(ClassInfo::new("com.example.B")));

        let mut visited = 0;
        let result = container.bean_foreach(|_| {
            visited += 1;
            Err("stop")
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_init_method_defaults_to_bean_class() {
        let bean = BeanWrap::new(ClassInfo::new("com.example.Bar"))
            .with_init_method(MethodDescriptor::new("", "setup"));
        assert_eq!(bean.init_method().unwrap().declaring_class, "com.example.Bar");

        let bean = BeanWrap::new(ClassInfo::new("com.example.Bar"))
            .with_init_method(MethodDescriptor::new("com.example.Base", "setup"));
        assert_eq!(bean.init_method().unwrap().declaring_class, "com.example.Base");
    }

    #[test]
    fn test_registrars_are_beans_of_type() {
        let mut container = Container::new();
        container
            .register_bean(BeanWrap::new(ClassInfo::new("com.example.A")))
            .register_bean(BeanWrap::registrar(
                ClassInfo::new("com.example.Registrar"),
                Arc::new(NoopRegistrar),
            ));

        assert_eq!(container.bean_count(), 2);
        assert_eq!(container.registrars().len(), 1);
    }
}
