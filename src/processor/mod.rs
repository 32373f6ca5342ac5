//! Bean hint derivation.
//!
//! [`BeanProcessor`](bean::BeanProcessor) walks the container; what each bean and method
//! contributes is decided by a [`BeanNativeProcessor`]. The default strategy is
//! [`DefaultBeanNativeProcessor`]. Applications can ship their own strategy by making it
//! loadable under [`EXTENSION_PROCESSOR_CLASS`]; it is then used for the whole run.
//!
//! # Example
//!
//! ```no_run
//! use aot_native_metadata::container::ClassLoader;
//! use aot_native_metadata::processor::select_processor;
//!
//! let class_loader = ClassLoader::new();
//! let processor = select_processor(&class_loader);
//! ```

pub mod bean;
pub mod default;

pub use bean::BeanProcessor;
pub use default::DefaultBeanNativeProcessor;

use crate::container::{ClassInfo, ClassLoader, MethodDescriptor};
use crate::metadata::NativeMetadata;
use log::info;

/// Well-known class name of an application-provided processor extension
pub const EXTENSION_PROCESSOR_CLASS: &str = "org.noear.solon.extend.impl.AopContextNativeProcessorExt";

/// Strategy deriving hints for beans and container methods.
///
/// Implementations may fail; the caller discards everything a failing call registered
/// and moves on to the next bean or method.
pub trait BeanNativeProcessor {
    /// Hints for the bean class itself (constructors, proxy class)
    fn process_bean(
        &self,
        metadata: &mut NativeMetadata,
        class: &ClassInfo,
        with_proxy: bool,
    ) -> anyhow::Result<()>;

    /// Hints for the fields of the bean class
    fn process_bean_fields(&self, metadata: &mut NativeMetadata, class: &ClassInfo) -> anyhow::Result<()>;

    /// Hints for a method definition known to the container
    fn process_method(&self, metadata: &mut NativeMetadata, method: &MethodDescriptor) -> anyhow::Result<()>;
}

/// Picks the extension processor when the application provides one, the default otherwise.
pub fn select_processor(class_loader: &ClassLoader) -> Box<dyn BeanNativeProcessor> {
    match class_loader.new_processor(EXTENSION_PROCESSOR_CLASS) {
        Some(processor) => {
            info!("Using bean native processor extension {}", EXTENSION_PROCESSOR_CLASS);
            processor
        }
        None => Box::new(DefaultBeanNativeProcessor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct MarkerProcessor;

    impl BeanNativeProcessor for MarkerProcessor {
        fn process_bean(&self, metadata: &mut NativeMetadata, _class: &ClassInfo, _with_proxy: bool) -> anyhow::Result<()> {
            metadata.register_serialization("marker");
            Ok(())
        }

        fn process_bean_fields(&self, _metadata: &mut NativeMetadata, _class: &ClassInfo) -> anyhow::Result<()> {
            Ok(())
        }

        fn process_method(&self, _metadata: &mut NativeMetadata, _method: &MethodDescriptor) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_falls_back_to_default() {
        let processor = select_processor(&ClassLoader::new());

        let mut metadata = NativeMetadata::new();
        processor
            .process_bean(&mut metadata, &ClassInfo::new("com.example.Foo"), false)
            .unwrap();

        assert!(metadata.serialization_class_names().next().is_none());
        assert!(metadata.reflection_entry("com.example.Foo").is_some());
    }

    #[test]
    fn test_uses_extension_when_loadable() {
        let mut class_loader = ClassLoader::new();
        class_loader.define_processor(
            EXTENSION_PROCESSOR_CLASS,
            Arc::new(|| Box::new(MarkerProcessor) as Box<dyn BeanNativeProcessor>),
        );

        let processor = select_processor(&class_loader);
        let mut metadata = NativeMetadata::new();
        processor
            .process_bean(&mut metadata, &ClassInfo::new("com.example.Foo"), false)
            .unwrap();

        assert_eq!(metadata.serialization_class_names().collect::<Vec<_>>(), vec!["marker"]);
    }
}
