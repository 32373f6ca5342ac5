use super::BeanNativeProcessor;
use crate::container::{BeanWrap, Container, MethodDescriptor};
use crate::error::Result;
use crate::metadata::{ExecutableMode, NativeMetadata};
use crate::proxy::ProxyClassGenerator;
use crate::settings::Settings;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Traverses the container and derives native hints for beans and method definitions.
///
/// Registrar beans and interface-typed beans are skipped. For every other bean the proxy
/// source is generated when the bean is intercepted, its init method is kept invocable, and
/// the [`BeanNativeProcessor`] contributes the rest.
///
/// Hint derivation is fail-closed: each delegate call registers into a staging
/// [`NativeMetadata`] that is merged only when the call succeeds. Proxy generation errors
/// abort the traversal.
pub struct BeanProcessor<'a> {
    settings: &'a Settings,
    processor: &'a dyn BeanNativeProcessor,
    proxy_generator: &'a ProxyClassGenerator,
    bean_count: AtomicUsize,
}

impl<'a> BeanProcessor<'a> {
    pub fn new(
        settings: &'a Settings,
        processor: &'a dyn BeanNativeProcessor,
        proxy_generator: &'a ProxyClassGenerator,
    ) -> Self {
        Self {
            settings,
            processor,
            proxy_generator,
            bean_count: AtomicUsize::new(0),
        }
    }

    /// Processes every bean and method definition of `container` into `metadata`.
    ///
    /// # Returns
    ///
    /// The number of beans processed, excluding skipped ones.
    ///
    /// # Errors
    ///
    /// Returns an error only when a proxy cannot be generated.
    pub fn process(&self, container: &Container, metadata: &mut NativeMetadata) -> Result<usize> {
        container.bean_foreach(|bean| self.process_bean(bean, metadata))?;

        container.method_foreach(|method| self.process_method(method, metadata));

        let count = self.bean_count.load(Ordering::SeqCst);
        info!("Aot process bean, bean size: {}", count);
        Ok(count)
    }

    /// Number of beans processed so far
    pub fn bean_count(&self) -> usize {
        self.bean_count.load(Ordering::SeqCst)
    }

    fn process_bean(&self, bean: &BeanWrap, metadata: &mut NativeMetadata) -> Result<()> {
        let class = bean.class();

        // Registrars are extractor infrastructure, not application beans
        if bean.is_registrar() {
            debug!("Skipping registrar bean {}", class.name);
            return Ok(());
        }

        if class.is_interface() {
            debug!("Skipping interface bean {}", class.name);
            return Ok(());
        }

        self.bean_count.fetch_add(1, Ordering::SeqCst);

        if bean.is_proxied() {
            self.proxy_generator.generate_code(self.settings, class)?;
        }

        if let Some(init) = bean.init_method() {
            metadata.register_method(init, ExecutableMode::Invoke);
        }

        let mut staging = NativeMetadata::new();
        let derived = self
            .processor
            .process_bean(&mut staging, class, bean.is_proxied())
            .and_then(|_| self.processor.process_bean_fields(&mut staging, class));

        match derived {
            Ok(()) => {
                metadata.merge(staging);
            }
            Err(e) => warn!("Skipping native hints for bean {}: {:#}", class.name, e),
        }
        Ok(())
    }

    fn process_method(&self, method: &MethodDescriptor, metadata: &mut NativeMetadata) {
        let mut staging = NativeMetadata::new();
        match self.processor.process_method(&mut staging, method) {
            Ok(()) => {
                metadata.merge(staging);
            }
            Err(e) => warn!(
                "Skipping native hints for method {}.{}: {:#}",
                method.declaring_class,
                method.signature(),
                e
            ),
        }
    }
}
