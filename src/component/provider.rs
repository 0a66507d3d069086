use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::component::component::Component;
use crate::component::container::{ComponentContainer, ComponentContainerInner};
use crate::component::types::{ComponentError, ComponentType, DynService};

/// Lazily builds and caches the single instance of one component inside a container.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    name: Arc<str>,
    container: Weak<ComponentContainerInner>,
    component: Mutex<Option<Component>>,
    instance: Mutex<Option<DynService>>,
}

impl Provider {
    pub(crate) fn new(name: &str, container: &ComponentContainer) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                name: Arc::from(name),
                container: Arc::downgrade(&container.inner),
                component: Mutex::new(None),
                instance: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        self.component().as_ref().map(Component::component_type)
    }

    pub fn is_component_set(&self) -> bool {
        self.component().is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.instance().is_some()
    }

    pub fn set_component(&self, component: Component) -> Result<(), ComponentError> {
        if component.name() != self.name() {
            return Err(ComponentError::MismatchingComponent {
                expected: self.name().to_string(),
                found: component.name().to_string(),
            });
        }

        let mut guard = self.component();
        if guard.is_some() {
            return Err(ComponentError::ComponentAlreadyProvided {
                name: self.name().to_string(),
            });
        }
        *guard = Some(component);
        Ok(())
    }

    /// Returns the instance when the component is set and its factory succeeds.
    pub fn get_immediate<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync + 'static,
    {
        self.get::<T>().ok()
    }

    pub fn get<T>(&self) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        self.get_or_initialize()?
            .downcast::<T>()
            .map_err(|_| ComponentError::InstanceUnavailable {
                name: self.name().to_string(),
            })
    }

    pub fn clear_instance(&self) {
        self.instance().take();
    }

    fn get_or_initialize(&self) -> Result<DynService, ComponentError> {
        if let Some(instance) = self.instance().as_ref() {
            return Ok(instance.clone());
        }

        let component =
            self.component()
                .clone()
                .ok_or_else(|| ComponentError::InstanceUnavailable {
                    name: self.name().to_string(),
                })?;

        let container = self
            .inner
            .container
            .upgrade()
            .map(|inner| ComponentContainer { inner })
            .ok_or_else(|| ComponentError::InitializationFailed {
                name: self.name().to_string(),
                reason: "container dropped".into(),
            })?;

        // The factory may consult other providers, so no lock is held while it runs.
        let created = (component.instance_factory)(&container).map_err(|err| match err {
            ComponentError::InitializationFailed { .. } => err,
            other => ComponentError::InitializationFailed {
                name: self.name().to_string(),
                reason: other.to_string(),
            },
        })?;

        let mut slot = self.instance();
        Ok(slot.get_or_insert(created).clone())
    }

    fn component(&self) -> MutexGuard<'_, Option<Component>> {
        self.inner
            .component
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn instance(&self) -> MutexGuard<'_, Option<DynService>> {
        self.inner
            .instance
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
