use std::sync::Arc;

use serde_json::{Map, Value};

use crate::analytics::{self, Analytics, AnalyticsResult};
use crate::app::api;
use crate::app::errors::{AppError, AppResult};
use crate::app::logger::{LogCallback, LogLevel, LogOptions};
use crate::app::types::{FirebaseApp, FirebaseAppSettings, FirebaseOptions};

/// Registration record a module hands to the namespace registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleNamespaceConfig {
    /// Accessor name, for example `analytics` in `firebase.analytics()`.
    pub namespace: &'static str,
    /// Name of the native module backing this namespace.
    pub native_module_name: &'static str,
    pub has_multi_app_support: bool,
    pub has_custom_url_support: bool,
    /// Values exposed on the namespace itself rather than on module instances.
    pub statics: Map<String, Value>,
}

type InstanceFactory<T, E> = Arc<dyn Fn(&FirebaseApp) -> Result<T, E> + Send + Sync>;

/// Resolves module instances for an app according to a [`ModuleNamespaceConfig`].
///
/// `E` is the module's own error type; app resolution failures are converted into it.
pub struct ModuleNamespace<T, E = AppError> {
    config: ModuleNamespaceConfig,
    factory: InstanceFactory<T, E>,
}

impl<T, E> ModuleNamespace<T, E>
where
    E: From<AppError>,
{
    pub fn new<F>(config: ModuleNamespaceConfig, factory: F) -> Self
    where
        F: Fn(&FirebaseApp) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Arc::new(factory),
        }
    }

    pub fn config(&self) -> &ModuleNamespaceConfig {
        &self.config
    }

    pub fn statics(&self) -> &Map<String, Value> {
        &self.config.statics
    }

    /// Returns the module instance for `app`, or for the default app when `None`.
    pub fn get_instance(&self, app: Option<&FirebaseApp>) -> Result<T, E> {
        let app = self.resolve_app(app)?;
        (self.factory)(&app)
    }

    fn resolve_app(&self, app: Option<&FirebaseApp>) -> AppResult<FirebaseApp> {
        let app = match app {
            Some(app) => app.clone(),
            None => api::get_app(None)?,
        };
        app.check_destroyed()?;
        if !self.config.has_multi_app_support && !app.is_default() {
            return Err(AppError::MultiAppNotSupported {
                namespace: self.config.namespace.to_string(),
                app_name: app.name().to_string(),
            });
        }
        Ok(app)
    }
}

impl<T, E> std::fmt::Debug for ModuleNamespace<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleNamespace")
            .field("config", &self.config)
            .finish()
    }
}

/// Entry point mirroring the `firebase` namespace object.
pub struct FirebaseNamespace;

impl FirebaseNamespace {
    pub fn initialize_app(
        options: FirebaseOptions,
        settings: Option<FirebaseAppSettings>,
    ) -> AppResult<FirebaseApp> {
        api::initialize_app(options, settings)
    }

    /// Returns an initialized app by name or the default app when `None` is provided.
    pub fn app(name: Option<&str>) -> AppResult<FirebaseApp> {
        api::get_app(name)
    }

    pub fn apps() -> Vec<FirebaseApp> {
        api::get_apps()
    }

    pub fn set_log_level(level: LogLevel) {
        api::set_log_level(level)
    }

    pub fn on_log(callback: Option<LogCallback>, options: Option<LogOptions>) -> AppResult<()> {
        api::on_log(callback, options)
    }

    pub fn sdk_version() -> &'static str {
        api::SDK_VERSION
    }

    /// `firebase.analytics()`: the analytics gateway of the given (or default) app.
    pub fn analytics(app: Option<&FirebaseApp>) -> AnalyticsResult<Arc<Analytics>> {
        analytics::get_analytics(app)
    }
}
