use std::sync::Arc;

use crate::app::constants::{APP_COMPONENT_NAME, DEFAULT_APP_NAME};
use crate::app::errors::{AppError, AppResult};
use crate::app::logger::{self, LogCallback, LogLevel, LogOptions, LOGGER};
use crate::app::registry;
use crate::app::types::{
    get_default_app_config, FirebaseApp, FirebaseAppConfig, FirebaseAppSettings, FirebaseOptions,
};
use crate::component::{Component, ComponentContainer, ComponentType, DynService, InstanceFactory};

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

fn normalize_name(settings: &FirebaseAppSettings) -> AppResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
    if name.trim().is_empty() {
        return Err(AppError::BadAppName { app_name: name });
    }
    Ok(name)
}

fn ensure_options(options: FirebaseOptions) -> AppResult<FirebaseOptions> {
    if options.is_defined() {
        return Ok(options);
    }
    match get_default_app_config()? {
        Some(defaults) if defaults.is_defined() => Ok(defaults),
        _ => Err(AppError::NoOptions),
    }
}

/// Creates (or returns the identical existing) app and attaches every registered component.
pub fn initialize_app(
    options: FirebaseOptions,
    settings: Option<FirebaseAppSettings>,
) -> AppResult<FirebaseApp> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;
    let automatic = settings.automatic_data_collection_enabled.unwrap_or(true);
    let options = ensure_options(options)?;
    let config = FirebaseAppConfig::new(name.clone(), automatic);

    let mut apps = registry::apps_guard();
    if let Some(existing) = apps.get(&name) {
        if existing.options() == options && existing.config() == config {
            return Ok(existing.clone());
        }
        return Err(AppError::DuplicateApp { app_name: name });
    }

    let container = ComponentContainer::new(name.clone());
    let app = FirebaseApp::new(options, config, container.clone());

    let app_for_factory = app.clone();
    let app_factory: InstanceFactory =
        Arc::new(move |_| Ok(Arc::new(app_for_factory.clone()) as DynService));
    container.add_component(Component::new(
        APP_COMPONENT_NAME,
        app_factory,
        ComponentType::Private,
    ))?;
    for component in registry::registered_components() {
        registry::add_component(&app, &component);
    }

    apps.insert(name.clone(), app.clone());
    drop(apps);

    LOGGER.debug(format!("Initialized Firebase App '{name}'"));
    Ok(app)
}

pub fn get_app(name: Option<&str>) -> AppResult<FirebaseApp> {
    let lookup = name.unwrap_or(DEFAULT_APP_NAME);
    registry::apps_guard()
        .get(lookup)
        .cloned()
        .ok_or_else(|| AppError::NoApp {
            app_name: lookup.to_string(),
        })
}

pub fn get_apps() -> Vec<FirebaseApp> {
    registry::apps_guard().values().cloned().collect()
}

/// Removes the app from the registry and drops its components and every service instance
/// they created.
pub fn delete_app(app: &FirebaseApp) -> AppResult<()> {
    let removed = registry::apps_guard().remove(app.name());
    if removed.is_some() {
        app.set_is_deleted(true);
        app.container().clear();
        LOGGER.debug(format!("Deleted Firebase App '{}'", app.name()));
    }
    Ok(())
}

pub fn on_log(callback: Option<LogCallback>, options: Option<LogOptions>) -> AppResult<()> {
    logger::set_user_log_handler(callback, options);
    Ok(())
}

pub fn set_log_level(level: LogLevel) {
    logger::set_log_level(level);
}
