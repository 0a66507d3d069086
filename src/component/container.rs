use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::component::provider::Provider;
use crate::component::types::{ComponentError, DynService};
use crate::component::Component;

/// Per-app set of providers, one per component name.
#[derive(Clone)]
pub struct ComponentContainer {
    pub(crate) inner: Arc<ComponentContainerInner>,
}

pub(crate) struct ComponentContainerInner {
    pub name: Arc<str>,
    pub providers: Mutex<HashMap<Arc<str>, Provider>>,
    pub root_service: Mutex<Option<DynService>>,
}

impl ComponentContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ComponentContainerInner {
                name: Arc::from(name.into()),
                providers: Mutex::new(HashMap::new()),
                root_service: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn add_component(&self, component: Component) -> Result<(), ComponentError> {
        let provider = self.get_provider(component.name());
        provider.set_component(component)
    }

    /// Replaces the component registered under the same name, dropping any cached instance.
    pub fn add_or_overwrite_component(&self, component: Component) {
        self.providers().remove(component.name());
        if let Err(err) = self.add_component(component) {
            log::debug!("container {} rejected component: {err}", self.name());
        }
    }

    pub fn get_provider(&self, name: &str) -> Provider {
        let mut providers = self.providers();
        if let Some(provider) = providers.get(name) {
            return provider.clone();
        }
        let provider = Provider::new(name, self);
        providers.insert(Arc::from(name), provider.clone());
        provider
    }

    pub fn get_providers(&self) -> Vec<Provider> {
        self.providers().values().cloned().collect()
    }

    pub fn attach_root_service(&self, service: DynService) {
        *self
            .inner
            .root_service
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()) = Some(service);
    }

    /// Returns the service the container was created for (the owning app).
    pub fn root_service<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner
            .root_service
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .as_ref()
            .and_then(|svc| Arc::clone(svc).downcast::<T>().ok())
    }

    /// Drops every provider and the root service, releasing the instances they hold.
    pub fn clear(&self) {
        let providers: Vec<Provider> = self.providers().drain().map(|(_, p)| p).collect();
        for provider in &providers {
            provider.clear_instance();
        }
        self.inner
            .root_service
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .take();
    }

    fn providers(&self) -> MutexGuard<'_, HashMap<Arc<str>, Provider>> {
        self.inner
            .providers
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("name", &self.name())
            .finish()
    }
}
