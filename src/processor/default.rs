use super::BeanNativeProcessor;
use crate::container::{ClassInfo, MethodDescriptor, TypeRef};
use crate::metadata::{ExecutableMode, NativeMetadata};
use crate::proxy::proxy_class_name;

/// Hint derivation used when the application ships no extension.
///
/// - Every bean keeps its default constructor. A proxied bean additionally keeps the
///   default constructor of its generated proxy and all public constructors of the target.
/// - Every declared field is registered.
/// - Container methods are registered for invocation.
/// - Serializable classes met along the way (bean classes, field types, parameter and
///   return types) are registered for serialization.
pub struct DefaultBeanNativeProcessor;

impl DefaultBeanNativeProcessor {
    fn register_serializable(metadata: &mut NativeMetadata, type_ref: &TypeRef) {
        if type_ref.serializable && !type_ref.is_primitive() {
            metadata.register_serialization(&type_ref.name);
        }
    }
}

impl BeanNativeProcessor for DefaultBeanNativeProcessor {
    fn process_bean(
        &self,
        metadata: &mut NativeMetadata,
        class: &ClassInfo,
        with_proxy: bool,
    ) -> anyhow::Result<()> {
        metadata.register_default_constructor(&class.name);

        if with_proxy {
            metadata
                .register_public_constructors(&class.name)
                .register_default_constructor(&proxy_class_name(&class.name));
        }

        if class.serializable {
            metadata.register_serialization(&class.name);
        }
        Ok(())
    }

    fn process_bean_fields(&self, metadata: &mut NativeMetadata, class: &ClassInfo) -> anyhow::Result<()> {
        for field in &class.fields {
            metadata.register_field(&class.name, &field.name);
            Self::register_serializable(metadata, &field.field_type);
        }
        Ok(())
    }

    fn process_method(&self, metadata: &mut NativeMetadata, method: &MethodDescriptor) -> anyhow::Result<()> {
        if method.declaring_class.is_empty() {
            anyhow::bail!("method {} has no declaring class", method.signature());
        }

        metadata.register_method(method, ExecutableMode::Invoke);

        for parameter in &method.parameters {
            Self::register_serializable(metadata, parameter);
        }
        if let Some(returns) = &method.returns {
            Self::register_serializable(metadata, returns);
        }
        Ok(())
    }
}
