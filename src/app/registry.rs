use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use crate::app::logger::LOGGER;
use crate::app::types::FirebaseApp;
use crate::component::{Component, Provider};

static APPS: LazyLock<Mutex<HashMap<String, FirebaseApp>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static REGISTERED_COMPONENTS: LazyLock<Mutex<HashMap<Arc<str>, Component>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub(crate) fn apps_guard() -> MutexGuard<'static, HashMap<String, FirebaseApp>> {
    APPS.lock().unwrap_or_else(|poison| poison.into_inner())
}

pub(crate) fn registered_components_guard() -> MutexGuard<'static, HashMap<Arc<str>, Component>> {
    REGISTERED_COMPONENTS
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Attaches a component to the given app, logging failures for debugging.
pub fn add_component(app: &FirebaseApp, component: &Component) {
    if let Err(err) = app.add_component(component.clone()) {
        LOGGER.debug(format!(
            "Component {} failed to register with FirebaseApp {}: {err}",
            component.name(),
            app.name()
        ));
    }
}

/// Registers a global component and propagates it to already-initialized apps.
///
/// Returns `false` when a component with the same name was registered before.
pub fn register_component(component: Component) -> bool {
    {
        let mut registered = registered_components_guard();
        if registered.contains_key(component.name()) {
            return false;
        }
        registered.insert(Arc::from(component.name()), component.clone());
    }

    let apps: Vec<FirebaseApp> = apps_guard().values().cloned().collect();
    for app in &apps {
        add_component(app, &component);
    }
    true
}

pub(crate) fn registered_components() -> Vec<Component> {
    registered_components_guard().values().cloned().collect()
}

pub fn get_provider(app: &FirebaseApp, name: &str) -> Provider {
    app.container().get_provider(name)
}

/// Drops the cached service instance of the named provider on the given app.
pub fn remove_service_instance(app: &FirebaseApp, name: &str) {
    get_provider(app, name).clear_instance();
}
