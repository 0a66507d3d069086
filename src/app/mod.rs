//! App registry and module namespace wiring.
//!
//! Modules such as [`crate::analytics`] register a component here and resolve their per-app
//! instance through a [`ModuleNamespace`].
mod api;
mod constants;
mod errors;
mod logger;
mod namespace;
pub(crate) mod registry;
mod types;

#[doc(inline)]
pub use api::{delete_app, get_app, get_apps, initialize_app, on_log, set_log_level, SDK_VERSION};

#[doc(inline)]
pub use constants::{DEFAULT_APP_NAME, DEFAULT_CONFIG_ENV};

#[doc(inline)]
pub use errors::{AppError, AppResult};

#[doc(inline)]
pub use logger::{LogCallback, LogLevel, LogOptions, Logger, LOGGER};

#[doc(inline)]
pub use namespace::{FirebaseNamespace, ModuleNamespace, ModuleNamespaceConfig};

#[doc(inline)]
pub use registry::{add_component, get_provider, register_component, remove_service_instance};

#[doc(inline)]
pub use types::{
    get_default_app_config, FirebaseApp, FirebaseAppConfig, FirebaseAppSettings, FirebaseOptions,
};
